/*!
Ranking of judged photo contest entries.

Records coming from folder scans and spreadsheet imports are reconciled by
their identity key, optionally averaged across three judges, ranked, and
then laid out as printable pages or flattened into an exportable table.

```
use photo_ranking::*;

let (set, _) = reconcile(
    &RecordSet::new(),
    SourceBatch::Spreadsheet(vec![ImportedRow {
        id: IdentityKey::parse("Fotos\\Ana\\1.jpg").unwrap(),
        display_name: Some("Amanecer".to_string()),
        scores: Scores::new(8.0, 7.0, 9.0),
        observations: String::new(),
    }].into()),
);
let ranked = rank(set.records());
assert_eq!(ranked[0].id.as_str(), "Fotos/Ana/1.jpg");
assert_eq!(ranked[0].total_score(), 24.0);
```
*/

mod average;
mod config;
mod error;
mod export;
mod identity;
mod import;
mod layout;
pub mod manual;
mod metrics;
mod reconcile;
mod store;

use std::cmp::Ordering;

pub use crate::average::*;
pub use crate::config::*;
pub use crate::error::*;
pub use crate::export::*;
pub use crate::identity::*;
pub use crate::import::*;
pub use crate::layout::*;
pub use crate::metrics::*;
pub use crate::reconcile::*;
pub use crate::store::*;

/// What the ranking, the report and the export need from a record.
pub trait RankedEntry {
    fn id(&self) -> &IdentityKey;
    fn display_name(&self) -> &str;
    fn scores(&self) -> Scores;
    fn total(&self) -> f64 {
        self.scores().total()
    }
    /// Free text shown in the last column. Empty when there is none.
    fn observations(&self) -> &str;
}

impl RankedEntry for ScoredRecord {
    fn id(&self) -> &IdentityKey {
        &self.id
    }
    fn display_name(&self) -> &str {
        &self.display_name
    }
    fn scores(&self) -> Scores {
        ScoredRecord::scores(self)
    }
    fn observations(&self) -> &str {
        &self.observations
    }
}

impl<T: RankedEntry + ?Sized> RankedEntry for &T {
    fn id(&self) -> &IdentityKey {
        (**self).id()
    }
    fn display_name(&self) -> &str {
        (**self).display_name()
    }
    fn scores(&self) -> Scores {
        (**self).scores()
    }
    fn total(&self) -> f64 {
        (**self).total()
    }
    fn observations(&self) -> &str {
        (**self).observations()
    }
}

/// Orders records by total score, highest first. Equal totals are ordered by
/// identity key so that the order never depends on the input order.
pub fn rank<I, T>(records: I) -> Vec<T>
where
    I: IntoIterator<Item = T>,
    T: RankedEntry,
{
    let mut res: Vec<T> = records.into_iter().collect();
    res.sort_by(compare_ranked);
    res
}

fn compare_ranked<T: RankedEntry>(a: &T, b: &T) -> Ordering {
    b.total()
        .total_cmp(&a.total())
        .then_with(|| a.id().cmp(b.id()))
}

/// A score as shown in the report and the export: the nearest integer,
/// halves away from zero.
pub fn whole(x: f64) -> i64 {
    if x.is_finite() {
        x.round() as i64
    } else {
        0
    }
}
