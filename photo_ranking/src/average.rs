use std::collections::{BTreeMap, BTreeSet};

use log::{debug, info, warn};

use crate::config::{AveragingOptions, ImportedRow, Scores};
use crate::error::{JudgeError, JudgeResult};
use crate::identity::{normalize_text, IdentityKey};
use crate::RankedEntry;

/// The number of judges of the averaged ranking.
pub const JUDGE_COUNT: usize = 3;

/// What one judge gave one image.
#[derive(PartialEq, Debug, Clone)]
pub struct JudgeEntry {
    pub display_name: Option<String>,
    pub scores: Scores,
}

/// The scores of one judge, built from one spreadsheet import.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct JudgeScoreSet {
    pub judge: String,
    entries: BTreeMap<IdentityKey, JudgeEntry>,
}

impl JudgeScoreSet {
    /// Builds the set from validated rows. When a key appears several times,
    /// the last row wins.
    pub fn from_rows(judge: &str, rows: Vec<ImportedRow>) -> JudgeScoreSet {
        let mut entries: BTreeMap<IdentityKey, JudgeEntry> = BTreeMap::new();
        for row in rows {
            let prev = entries.insert(
                row.id.clone(),
                JudgeEntry {
                    display_name: row.display_name,
                    scores: row.scores,
                },
            );
            if prev.is_some() {
                warn!(
                    "JudgeScoreSet::from_rows: judge {:?} scored {} several times, keeping the last row",
                    judge, row.id
                );
            }
        }
        debug!(
            "JudgeScoreSet::from_rows: judge {:?}: {} entries",
            judge,
            entries.len()
        );
        JudgeScoreSet {
            judge: judge.to_string(),
            entries,
        }
    }

    pub fn get(&self, id: &IdentityKey) -> Option<&JudgeEntry> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The mean of the judges' scores for one image.
#[derive(PartialEq, Debug, Clone)]
pub struct AveragedRecord {
    pub id: IdentityKey,
    pub display_name: String,
    pub scores: Scores,
    /// How many judges scored this image.
    pub judges: usize,
}

impl RankedEntry for AveragedRecord {
    fn id(&self) -> &IdentityKey {
        &self.id
    }
    fn display_name(&self) -> &str {
        &self.display_name
    }
    fn scores(&self) -> Scores {
        self.scores
    }
    fn observations(&self) -> &str {
        ""
    }
}

/// Averages the scores of the three judges.
///
/// Each axis is divided by the number of judges who scored that image, not
/// by three. Fails with `MissingJudgeData` unless the three slots are filled.
pub fn average(
    judges: &[Option<JudgeScoreSet>; JUDGE_COUNT],
    options: &AveragingOptions,
) -> JudgeResult<Vec<AveragedRecord>> {
    let missing: Vec<usize> = judges
        .iter()
        .enumerate()
        .filter(|(_, j)| j.is_none())
        .map(|(idx, _)| idx + 1)
        .collect();
    if !missing.is_empty() {
        return Err(JudgeError::MissingJudgeData { missing });
    }
    let sets: Vec<&JudgeScoreSet> = judges.iter().flatten().collect();

    let keys: BTreeSet<&IdentityKey> = sets.iter().flat_map(|s| s.entries.keys()).collect();
    info!(
        "average: {} images scored by judges {:?}",
        keys.len(),
        sets.iter().map(|s| s.judge.as_str()).collect::<Vec<_>>()
    );

    let mut res: Vec<AveragedRecord> = Vec::with_capacity(keys.len());
    for id in keys {
        let entries: Vec<&JudgeEntry> = sets.iter().filter_map(|s| s.get(id)).collect();
        let n = entries.len() as f64;
        let mut sums = [0.0; 3];
        for e in entries.iter() {
            for (acc, x) in sums.iter_mut().zip(e.scores.axes()) {
                *acc += x;
            }
        }
        let display_name = contestant_name(id, &entries, options);
        res.push(AveragedRecord {
            id: id.clone(),
            display_name,
            scores: Scores::new(sums[0] / n, sums[1] / n, sums[2] / n),
            judges: entries.len(),
        });
    }
    Ok(res)
}

/// The contestant is the folder right under the contestant root, e.g.
/// `CONCURSANTES/Ana Pérez/foto.jpg` is shown as `ANA PÉREZ`.
fn contestant_name(id: &IdentityKey, entries: &[&JudgeEntry], options: &AveragingOptions) -> String {
    let segments = id.segments();
    if segments.len() >= 2 && segments[0].to_lowercase() == options.contestant_root.to_lowercase() {
        return normalize_text(&segments[1].to_uppercase());
    }
    let fallback = entries
        .iter()
        .filter_map(|e| e.display_name.as_deref())
        .find(|s| !s.is_empty())
        .or_else(|| segments.first().copied())
        .unwrap_or_else(|| id.as_str());
    warn!(
        "average: {} is not under {:?}, using {:?} as contestant name",
        id, options.contestant_root, fallback
    );
    normalize_text(&fallback.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank;

    fn row(id: &str, name: Option<&str>, s: [f64; 3]) -> ImportedRow {
        ImportedRow {
            id: IdentityKey::parse(id).unwrap(),
            display_name: name.map(|n| n.to_string()),
            scores: Scores::new(s[0], s[1], s[2]),
            observations: "ignored".to_string(),
        }
    }

    fn judges(a: Vec<ImportedRow>, b: Vec<ImportedRow>, c: Vec<ImportedRow>) -> [Option<JudgeScoreSet>; 3] {
        [
            Some(JudgeScoreSet::from_rows("A", a)),
            Some(JudgeScoreSet::from_rows("B", b)),
            Some(JudgeScoreSet::from_rows("C", c)),
        ]
    }

    #[test]
    fn divides_by_judges_who_scored() {
        let k = "CONCURSANTES/Ana/k.jpg";
        let res = average(
            &judges(
                vec![row(k, None, [10.0, 0.0, 0.0])],
                vec![row(k, None, [0.0, 10.0, 0.0])],
                vec![row("CONCURSANTES/Luis/z.jpg", None, [1.0, 1.0, 1.0])],
            ),
            &AveragingOptions::default(),
        )
        .unwrap();
        assert_eq!(res.len(), 2);
        let r = res.iter().find(|r| r.id.as_str() == k).unwrap();
        assert_eq!(r.scores, Scores::new(5.0, 5.0, 0.0));
        assert_eq!(r.total(), 10.0);
        assert_eq!(r.judges, 2);
        assert_eq!(r.observations(), "");
    }

    #[test]
    fn missing_judge_fails() {
        let res = average(
            &[
                Some(JudgeScoreSet::from_rows("A", vec![row("a.jpg", None, [1.0, 1.0, 1.0])])),
                None,
                Some(JudgeScoreSet::default()),
            ],
            &AveragingOptions::default(),
        );
        match res {
            Err(JudgeError::MissingJudgeData { missing }) => assert_eq!(missing, vec![2]),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn contestant_from_path() {
        let res = average(
            &judges(
                vec![row("concursantes/Jose\u{0301} Pérez/1.jpg", Some("Uno"), [1.0, 1.0, 1.0])],
                vec![],
                vec![],
            ),
            &AveragingOptions::default(),
        )
        .unwrap();
        assert_eq!(res[0].display_name, "JOSÉ PÉREZ");
    }

    #[test]
    fn contestant_fallbacks() {
        let res = average(
            &judges(
                vec![
                    row("Otros/Ana/1.jpg", None, [1.0, 1.0, 1.0]),
                    row("CONCURSANTES", None, [1.0, 1.0, 1.0]),
                ],
                vec![row("Otros/Ana/1.jpg", Some("Amanecer"), [1.0, 1.0, 1.0])],
                vec![row("otros.jpg", None, [1.0, 1.0, 1.0])],
            ),
            &AveragingOptions::default(),
        )
        .unwrap();
        let names: Vec<&str> = res.iter().map(|r| r.display_name.as_str()).collect();
        assert_eq!(names, vec!["CONCURSANTES", "AMANECER", "OTROS.JPG"]);
    }

    #[test]
    fn last_duplicate_row_wins() {
        let set = JudgeScoreSet::from_rows(
            "A",
            vec![row("a.jpg", None, [1.0, 1.0, 1.0]), row("a.jpg", None, [2.0, 2.0, 2.0])],
        );
        assert_eq!(set.len(), 1);
        assert_eq!(
            set.get(&IdentityKey::parse("a.jpg").unwrap()).unwrap().scores,
            Scores::new(2.0, 2.0, 2.0)
        );
    }

    #[test]
    fn averaged_ranking() {
        let res = average(
            &judges(
                vec![row("CONCURSANTES/B/1.jpg", None, [6.0, 6.0, 8.0])],
                vec![row("CONCURSANTES/A/1.jpg", None, [10.0, 10.0, 0.0])],
                vec![row("CONCURSANTES/C/1.jpg", None, [1.0, 1.0, 1.0])],
            ),
            &AveragingOptions::default(),
        )
        .unwrap();
        let ranked = rank(res.iter());
        let ids: Vec<&str> = ranked.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["CONCURSANTES/A/1.jpg", "CONCURSANTES/B/1.jpg", "CONCURSANTES/C/1.jpg"]
        );
    }
}
