use serde::{Deserialize, Serialize};

/// One line of the league table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsRow {
    pub name: String,
    pub points: u32,
    pub played: u32,
}

impl StandingsRow {
    /// Row with no points and no matches played.
    pub fn new(name: &str) -> Self {
        StandingsRow {
            name: name.to_string(),
            points: 0,
            played: 0,
        }
    }
}

/// A row together with its table position (1-based).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RankedRow<'a> {
    pub position: usize,
    pub row: &'a StandingsRow,
}

/// League table kept in participant insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Standings {
    rows: Vec<StandingsRow>,
}

impl Standings {
    /// Zeroed table for the given participants.
    pub fn new<S: AsRef<str>>(participants: &[S]) -> Self {
        Standings {
            rows: participants.iter().map(|p| StandingsRow::new(p.as_ref())).collect(),
        }
    }

    /// Rows in insertion order.
    pub fn rows(&self) -> &[StandingsRow] {
        &self.rows
    }

    /// Row for `name`, if it is in the table.
    pub fn row(&self, name: &str) -> Option<&StandingsRow> {
        self.rows.iter().find(|r| r.name == name)
    }

    /// Number of participants.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Credit one played match to `name`. Returns false if `name` has no row.
    pub fn record(&mut self, name: &str, points: u32) -> bool {
        match self.rows.iter_mut().find(|r| r.name == name) {
            Some(row) => {
                row.points += points;
                row.played += 1;
                true
            }
            None => false,
        }
    }

    /// Indices into `rows()` in table order.
    ///
    /// Points descending; ties keep insertion order.
    pub fn order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.rows.len()).collect();
        order.sort_by(|&a, &b| self.rows[b].points.cmp(&self.rows[a].points));
        order
    }

    /// Rows in table order with positions.
    pub fn sorted(&self) -> Vec<RankedRow<'_>> {
        self.order()
            .into_iter()
            .enumerate()
            .map(|(i, idx)| RankedRow {
                position: i + 1,
                row: &self.rows[idx],
            })
            .collect()
    }

    /// 1-based table position of `name`.
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.order()
            .iter()
            .position(|&idx| self.rows[idx].name == name)
            .map(|p| p + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record() {
        let mut table = Standings::new(&["You", "A"]);
        assert!(table.record("You", 3));
        assert!(table.record("A", 0));
        assert!(!table.record("Nobody", 3));

        let you = StandingsRow {
            name: "You".to_string(),
            points: 3,
            played: 1,
        };
        assert_eq!(table.row("You"), Some(&you));
        assert_eq!(table.row("A").map(|r| (r.points, r.played)), Some((0, 1)));
    }

    #[test]
    fn test_sorted_is_stable_on_ties() {
        let mut table = Standings::new(&["You", "A", "B", "C"]);
        table.record("B", 3);
        table.record("C", 1);
        table.record("A", 1);

        let names: Vec<&str> = table.sorted().iter().map(|r| r.row.name.as_str()).collect();
        // A and C are level; A was inserted first
        assert_eq!(names, vec!["B", "A", "C", "You"]);

        let positions: Vec<usize> = table.sorted().iter().map(|r| r.position).collect();
        assert_eq!(positions, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_sorting_leaves_storage_order_alone() {
        let mut table = Standings::new(&["You", "A"]);
        table.record("A", 3);
        let _ = table.sorted();
        assert_eq!(table.rows()[0].name, "You");
        assert_eq!(table.position_of("A"), Some(1));
        assert_eq!(table.position_of("You"), Some(2));
        assert_eq!(table.position_of("Z"), None);
    }
}
