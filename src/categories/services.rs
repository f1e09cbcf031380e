use tracing::{info, warn};

use crate::categories::repo_types::Category;
use crate::store::TrackerStore;

/// Insert every configured category that does not exist yet.
pub async fn seed_categories(
    store: &dyn TrackerStore,
    names: &[String],
) -> anyhow::Result<Vec<Category>> {
    let mut seeded = Vec::with_capacity(names.len());
    for name in names {
        let name = name.trim();
        if name.is_empty() {
            warn!("skipping empty category name");
            continue;
        }
        let category = store.ensure_category(name).await?;
        seeded.push(category);
    }
    info!(count = seeded.len(), "categories seeded");
    Ok(seeded)
}
