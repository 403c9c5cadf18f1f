//! Multi-criteria search over the speech repository.

use std::{collections::HashSet, sync::Arc};

use futures::future::try_join_all;

use super::criteria::{DateRange, Predicate, SearchCriteria};
use crate::domain::{
    models::{Speech, SpeechId},
    ports::outbound::SpeechRepository,
    SpeechError,
};

/// Combines independent predicate lookups into one result set.
///
/// Each supplied predicate is evaluated on its own against the whole
/// repository. The resulting id sets are intersected and the survivors are
/// loaded with a single bulk fetch. Result order is unspecified.
pub struct SpeechSearchEngine<R> {
    repository: Arc<R>,
}

impl<R> Clone for SpeechSearchEngine<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: SpeechRepository> SpeechSearchEngine<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<Speech>, SpeechError> {
        self.evaluate(&criteria.predicates()).await
    }

    async fn evaluate(&self, predicates: &[Predicate]) -> Result<Vec<Speech>, SpeechError> {
        if predicates.is_empty() {
            return self.repository.find_all().await;
        }

        tracing::debug!(predicates = predicates.len(), "evaluating search predicates");

        let id_sets = try_join_all(
            predicates
                .iter()
                .map(|predicate| self.matching_ids(predicate)),
        )
        .await?;

        let ids = intersect(id_sets);
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        self.repository.find_all_by_id(&ids).await
    }

    async fn matching_ids(&self, predicate: &Predicate) -> Result<HashSet<SpeechId>, SpeechError> {
        let speeches = match predicate {
            Predicate::Author(author) => self.repository.find_by_author_containing(author).await?,
            Predicate::Date(DateRange::Between(from, to)) => {
                self.repository
                    .find_by_speech_date_between(*from, *to)
                    .await?
            }
            Predicate::Date(DateRange::From(from)) => {
                self.repository.find_by_speech_date_from(*from).await?
            }
            Predicate::Date(DateRange::Until(to)) => {
                self.repository.find_by_speech_date_until(*to).await?
            }
            Predicate::Keyword(keyword) => {
                self.repository.find_by_keyword_containing(keyword).await?
            }
            Predicate::Text(text) => self.repository.find_by_text_containing(text).await?,
        };

        Ok(speeches.into_iter().filter_map(|speech| speech.id).collect())
    }
}

/// Intersection of all sets. Empty input yields an empty set.
fn intersect(sets: Vec<HashSet<SpeechId>>) -> HashSet<SpeechId> {
    let mut sets = sets.into_iter();
    let Some(mut acc) = sets.next() else {
        return HashSet::new();
    };

    for set in sets {
        if acc.is_empty() {
            break;
        }
        acc.retain(|id| set.contains(id));
    }

    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::memory::InMemorySpeechRepository;
    use time::macros::date;

    fn repository() -> Arc<InMemorySpeechRepository> {
        Arc::new(InMemorySpeechRepository::with_speeches(vec![
            Speech::new("This is a test speech about technology", "John Doe")
                .with_author_email("john@example.com")
                .with_keywords(["tech", "innovation"])
                .with_speech_date(date!(2024 - 01 - 15)),
            Speech::new("Another speech about climate change", "Jane Smith")
                .with_author_email("jane@example.com")
                .with_keywords(["climate"])
                .with_speech_date(date!(2024 - 02 - 20)),
            Speech::new("Speech about technology and innovation", "John Miller")
                .with_author_email("miller@example.com")
                .with_keywords(["tech", "future"])
                .with_speech_date(date!(2024 - 03 - 10)),
        ]))
    }

    fn ids(speeches: &[Speech]) -> Vec<i64> {
        let mut ids: Vec<i64> = speeches
            .iter()
            .filter_map(|speech| speech.id.map(|id| id.as_i64()))
            .collect();
        ids.sort();
        ids
    }

    async fn run(repo: &Arc<InMemorySpeechRepository>, criteria: SearchCriteria) -> Vec<i64> {
        let engine = SpeechSearchEngine::new(Arc::clone(repo));
        ids(&engine.search(&criteria).await.unwrap())
    }

    #[tokio::test]
    async fn no_criteria_returns_everything() {
        let repo = repository();
        assert_eq!(run(&repo, SearchCriteria::new()).await, vec![1, 2, 3]);
        assert_eq!(repo.bulk_fetch_count(), 0);
    }

    #[tokio::test]
    async fn blank_criteria_behave_like_no_criteria() {
        let repo = repository();
        let blank = SearchCriteria::new().author("").keyword("").text("");
        assert_eq!(run(&repo, blank).await, run(&repo, SearchCriteria::new()).await);
    }

    #[tokio::test]
    async fn author_and_keyword_intersect() {
        let repo = repository();
        let criteria = SearchCriteria::new().author("john").keyword("tech");
        assert_eq!(run(&repo, criteria).await, vec![1, 3]);
    }

    #[tokio::test]
    async fn disjoint_criteria_short_circuit_without_bulk_fetch() {
        let repo = repository();
        let criteria = SearchCriteria::new().author("john").keyword("climate");
        assert!(run(&repo, criteria).await.is_empty());
        assert_eq!(repo.bulk_fetch_count(), 0);
    }

    #[tokio::test]
    async fn matching_criteria_use_exactly_one_bulk_fetch() {
        let repo = repository();
        let criteria = SearchCriteria::new()
            .author("john")
            .keyword("tech")
            .text("technology");
        assert_eq!(run(&repo, criteria).await, vec![1, 3]);
        assert_eq!(repo.bulk_fetch_count(), 1);
    }

    #[tokio::test]
    async fn closed_date_range_is_inclusive() {
        let repo = repository();
        let february = SearchCriteria::new()
            .from_date(date!(2024 - 02 - 01))
            .to_date(date!(2024 - 02 - 28));
        assert_eq!(run(&repo, february).await, vec![2]);

        let exact = SearchCriteria::new()
            .from_date(date!(2024 - 01 - 15))
            .to_date(date!(2024 - 03 - 10));
        assert_eq!(run(&repo, exact).await, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn open_date_ranges() {
        let repo = repository();
        let from = SearchCriteria::new().from_date(date!(2024 - 02 - 20));
        assert_eq!(run(&repo, from).await, vec![2, 3]);

        let until = SearchCriteria::new().to_date(date!(2024 - 02 - 20));
        assert_eq!(run(&repo, until).await, vec![1, 2]);
    }

    #[tokio::test]
    async fn inverted_range_is_empty_not_an_error() {
        let repo = repository();
        let criteria = SearchCriteria::new()
            .from_date(date!(2024 - 03 - 01))
            .to_date(date!(2024 - 01 - 01));
        assert!(run(&repo, criteria).await.is_empty());
    }

    #[tokio::test]
    async fn text_match_is_case_insensitive() {
        let repo = repository();
        let criteria = SearchCriteria::new().text("CLIMATE");
        assert_eq!(run(&repo, criteria).await, vec![2]);
    }

    #[tokio::test]
    async fn keyword_matches_substring_of_any_keyword() {
        let repo = repository();
        let criteria = SearchCriteria::new().keyword("NOV");
        assert_eq!(run(&repo, criteria).await, vec![1]);
    }

    #[tokio::test]
    async fn result_does_not_depend_on_predicate_order() {
        let repo = repository();
        let engine = SpeechSearchEngine::new(Arc::clone(&repo));
        let predicates = SearchCriteria::new()
            .author("john")
            .to_date(date!(2024 - 02 - 01))
            .keyword("tech")
            .text("technology")
            .predicates();
        assert_eq!(predicates.len(), 4);

        let mut orderings = Vec::new();
        for shift in 0..predicates.len() {
            let mut rotated = predicates.clone();
            rotated.rotate_left(shift);
            let mut reversed = rotated.clone();
            reversed.reverse();
            orderings.push(rotated);
            orderings.push(reversed);
        }

        for ordering in orderings {
            let found = engine.evaluate(&ordering).await.unwrap();
            assert_eq!(ids(&found), vec![1], "ordering {:?}", ordering);
        }
        assert_eq!(repo.bulk_fetch_count(), 8);
    }

    #[tokio::test]
    async fn nothing_matches_returns_empty() {
        let repo = repository();
        let criteria = SearchCriteria::new().author("nobody");
        assert!(run(&repo, criteria).await.is_empty());
    }

    #[test]
    fn intersect_handles_edge_cases() {
        assert!(intersect(vec![]).is_empty());

        let a = HashSet::from([SpeechId::new(1), SpeechId::new(2)]);
        let b = HashSet::from([SpeechId::new(2), SpeechId::new(3)]);
        let c = HashSet::from([SpeechId::new(2)]);
        assert_eq!(intersect(vec![a.clone(), b.clone(), c.clone()]), c);
        assert_eq!(intersect(vec![c.clone(), b, a]), c);
    }
}
