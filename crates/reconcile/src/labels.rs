//! Get-or-create for status labels.
//!
//! One [`LabelEnsurer`] serves a whole batch. It starts from the repository's
//! existing labels and appends every label it creates, so documents sharing a
//! status create that label at most once per run, in enumeration order.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::info;

use crate::ports::DiscussionStore;
use crate::{Label, RepositoryNodeId, StoreError};

/// Description attached to every label this system creates.
pub const LABEL_DESCRIPTION: &str = "Created by adr-sync";

/// A label colour: six lower-case hex digits, uniform over `000000..=ffffff`.
pub fn random_color<R: RngCore + ?Sized>(rng: &mut R) -> String {
    // Top 24 bits of one draw.
    format!("{:06x}", rng.next_u32() >> 8)
}

/// Batch-scoped label cache with lazy creation.
pub struct LabelEnsurer<R = StdRng> {
    repository_id: RepositoryNodeId,
    known: Vec<Label>,
    rng: R,
}

impl LabelEnsurer<StdRng> {
    pub fn new(repository_id: RepositoryNodeId, known: Vec<Label>) -> Self {
        Self::with_rng(repository_id, known, StdRng::from_entropy())
    }
}

impl<R: RngCore + Send> LabelEnsurer<R> {
    /// Uses `rng` for label colours.
    pub fn with_rng(repository_id: RepositoryNodeId, known: Vec<Label>, rng: R) -> Self {
        Self {
            repository_id,
            known,
            rng,
        }
    }

    /// Returns the label named exactly `status`, creating it if needed.
    /// A `None` status yields `None` without touching the store.
    pub async fn ensure(
        &mut self,
        store: &dyn DiscussionStore,
        status: Option<&str>,
    ) -> Result<Option<Label>, StoreError> {
        let Some(status) = status else {
            return Ok(None);
        };

        if let Some(label) = self.known.iter().find(|label| label.name == status) {
            return Ok(Some(label.clone()));
        }

        let color = random_color(&mut self.rng);
        let label = store
            .create_label(&self.repository_id, status, &color, LABEL_DESCRIPTION)
            .await?;
        info!(label = %label.name, %color, "Created status label");

        self.known.push(label.clone());
        Ok(Some(label))
    }
}
