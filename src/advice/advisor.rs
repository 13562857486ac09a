use super::*;

/// Something that turns a [`Batch`] of raw numbers into free-text
/// calculation ideas, typically a remote model.
///
/// Advisors only ever see the batch. They never read or change scoring
/// state, and a failure is the caller's to display.
#[async_trait::async_trait]
pub trait Advisor: Send + Sync {
    async fn suggest(&self, batch: &Batch) -> anyhow::Result<Vec<String>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    struct Sums;

    #[async_trait::async_trait]
    impl Advisor for Sums {
        async fn suggest(&self, batch: &Batch) -> anyhow::Result<Vec<String>> {
            Ok(batch
                .rows()
                .iter()
                .enumerate()
                .map(|(i, row)| format!("user {} sums to {}", i, row.iter().sum::<f64>()))
                .collect())
        }
    }

    struct Offline;

    #[async_trait::async_trait]
    impl Advisor for Offline {
        async fn suggest(&self, _: &Batch) -> anyhow::Result<Vec<String>> {
            Err(anyhow::anyhow!("advisor unreachable"))
        }
    }

    #[test]
    fn suggestions_come_back_per_row() {
        let batch = Batch::try_from("1 2 3 4 5 6; 0 0 0 0 0 0; 1 1 1 1 1 1; nan 1 0 0 0 0").unwrap();
        let advice = block_on(Sums.suggest(&batch)).unwrap();
        assert_eq!(advice.len(), 4);
        assert_eq!(advice[0], "user 0 sums to 21");
        assert_eq!(advice[3], "user 3 sums to 1");
    }

    #[test]
    fn advisors_are_interchangeable() {
        let advisors: Vec<Box<dyn Advisor>> = vec![Box::new(Sums), Box::new(Offline)];
        let batch = Batch::default();
        let results = advisors
            .iter()
            .map(|a| block_on(a.suggest(&batch)))
            .collect::<Vec<_>>();
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }
}
