use crate::domain::{ColumnKey, TermLevel};
use std::collections::BTreeSet;

/// Levels of one multiplicity and the columns they occupy.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiplicityGroup {
    pub multiplicity: u8,
    /// Distinct `(l, parity)` columns, sorted.
    pub columns: Vec<ColumnKey>,
    /// Indices into the level table, sorted by `(l, energy)`.
    pub members: Vec<usize>,
    /// Slot index of the first column of this group.
    pub first_slot: usize,
}

impl MultiplicityGroup {
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    fn slot_of(&self, key: ColumnKey) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| *column == key)
            .map(|offset| self.first_slot + offset)
    }
}

/// Horizontal geometry of a Grotrian diagram.
///
/// The x axis runs from 0 to 100 and is cut into `total_slots` equal slots:
/// one per column of every group plus one separator slot per group.
#[derive(Debug, Clone, PartialEq)]
pub struct GrotrianLayout {
    pub groups: Vec<MultiplicityGroup>,
    pub total_slots: usize,
    pub unit: f64,
    /// Level indices in ascending energy.
    pub by_energy: Vec<usize>,
    slots: Vec<usize>,
}

impl GrotrianLayout {
    /// Returns `None` when there is nothing to lay out.
    pub fn compute(levels: &[TermLevel]) -> Option<Self> {
        if levels.is_empty() {
            return None;
        }

        let mut by_energy: Vec<usize> = (0..levels.len()).collect();
        by_energy.sort_by(|lhs, rhs| levels[*lhs].energy().total_cmp(&levels[*rhs].energy()));

        let multiplicities: BTreeSet<u8> =
            levels.iter().map(TermLevel::multiplicity).collect();

        let mut groups = Vec::with_capacity(multiplicities.len());
        let mut first_slot = 0;
        for multiplicity in multiplicities {
            let mut members: Vec<usize> = by_energy
                .iter()
                .copied()
                .filter(|index| levels[*index].multiplicity() == multiplicity)
                .collect();
            members.sort_by(|lhs, rhs| {
                let (lhs, rhs) = (&levels[*lhs], &levels[*rhs]);
                lhs.symbol
                    .l
                    .cmp(&rhs.symbol.l)
                    .then_with(|| lhs.energy().total_cmp(&rhs.energy()))
            });

            let columns: Vec<ColumnKey> = members
                .iter()
                .map(|index| levels[*index].column_key())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();

            let group = MultiplicityGroup {
                multiplicity,
                columns,
                members,
                first_slot,
            };
            first_slot += group.width() + 1;
            groups.push(group);
        }

        let total_slots = first_slot;
        let unit = 100.0 / total_slots as f64;

        let mut slots = vec![0; levels.len()];
        for group in &groups {
            for index in &group.members {
                if let Some(slot) = group.slot_of(levels[*index].column_key()) {
                    slots[*index] = slot;
                }
            }
        }

        Some(Self {
            groups,
            total_slots,
            unit,
            by_energy,
            slots,
        })
    }

    /// Slot of the level at `index` in the table the layout was computed from.
    pub fn slot(&self, index: usize) -> usize {
        self.slots[index]
    }

    pub fn top_label_count(&self) -> usize {
        self.groups.iter().map(MultiplicityGroup::width).sum()
    }

    pub fn lowest(&self) -> usize {
        self.by_energy[0]
    }

    pub fn highest(&self) -> usize {
        self.by_energy[self.by_energy.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::GrotrianLayout;
    use crate::domain::{ColumnKey, Level, Parity, TermLevel, TermSymbol};

    fn level(term: &str, parity: Parity, energy: f64) -> TermLevel {
        TermLevel {
            level: Level {
                term: term.to_string(),
                parity,
                energy,
                ..Level::default()
            },
            symbol: TermSymbol::parse(term).expect("term should decode"),
            n: 2,
        }
    }

    #[test]
    fn empty_input_has_no_layout() {
        assert_eq!(GrotrianLayout::compute(&[]), None);
    }

    #[test]
    fn singlets_and_triplets_share_the_axis() {
        let levels = vec![
            level("1S", Parity::Even, 0.0),
            level("3P", Parity::Odd, 50_000.0),
            level("1P", Parity::Odd, 80_000.0),
        ];

        let layout = GrotrianLayout::compute(&levels).expect("layout should exist");
        assert_eq!(layout.groups.len(), 2);
        assert_eq!(layout.groups[0].multiplicity, 1);
        assert_eq!(layout.groups[1].multiplicity, 3);
        assert_eq!(layout.groups[0].width(), 2);
        assert_eq!(layout.groups[1].width(), 1);
        assert_eq!(layout.total_slots, 5);
        assert!((layout.unit - 20.0).abs() < 1.0e-12);

        assert_eq!(layout.slot(0), 0);
        assert_eq!(layout.slot(2), 1);
        assert_eq!(layout.slot(1), 3);
        assert_eq!(layout.groups[1].first_slot, 3);
        assert_eq!(layout.top_label_count(), 3);
    }

    #[test]
    fn single_doublet_column_pair_uses_three_slots() {
        let levels = vec![
            level("2P", Parity::Odd, 1000.0),
            level("2S", Parity::Even, 0.0),
        ];

        let layout = GrotrianLayout::compute(&levels).expect("layout should exist");
        assert_eq!(layout.total_slots, 3);
        assert!((layout.unit - 100.0 / 3.0).abs() < 1.0e-12);
        assert_eq!(layout.lowest(), 1);
        assert_eq!(layout.highest(), 0);
        assert_eq!(layout.slot(1), 0);
        assert_eq!(layout.slot(0), 1);
    }

    #[test]
    fn members_sort_by_l_then_energy_across_parities() {
        let levels = vec![
            level("2P", Parity::Even, 300.0),
            level("2P", Parity::Odd, 100.0),
            level("2S", Parity::Even, 500.0),
            level("2P", Parity::Odd, 200.0),
        ];

        let layout = GrotrianLayout::compute(&levels).expect("layout should exist");
        let group = &layout.groups[0];
        assert_eq!(group.members, vec![2, 1, 3, 0]);
        assert_eq!(
            group.columns,
            vec![
                ColumnKey { l: 0, parity: Parity::Even },
                ColumnKey { l: 1, parity: Parity::Even },
                ColumnKey { l: 1, parity: Parity::Odd },
            ]
        );
        assert_eq!(layout.slot(0), 1);
        assert_eq!(layout.slot(1), 2);
        assert_eq!(layout.slot(2), 0);
    }

    fn mixed_multiplicities() -> Vec<TermLevel> {
        vec![
            level("2S", Parity::Even, 0.0),
            level("4P", Parity::Odd, 70_000.0),
            level("2P", Parity::Odd, 64_484.0),
            level("4D", Parity::Even, 320_000.0),
            level("2D", Parity::Even, 302_849.0),
            level("1S", Parity::Even, 150_000.0),
            level("4P", Parity::Odd, 71_000.0),
        ]
    }

    #[test]
    fn groups_partition_the_level_table() {
        let levels = mixed_multiplicities();
        let layout = GrotrianLayout::compute(&levels).expect("layout should exist");

        let multiplicities: Vec<u8> = layout.groups.iter().map(|group| group.multiplicity).collect();
        assert_eq!(multiplicities, vec![1, 2, 4]);

        let mut members: Vec<usize> = layout
            .groups
            .iter()
            .flat_map(|group| group.members.iter().copied())
            .collect();
        members.sort_unstable();
        assert_eq!(members, (0..levels.len()).collect::<Vec<_>>());

        for group in &layout.groups {
            for index in &group.members {
                assert_eq!(levels[*index].multiplicity(), group.multiplicity);
                let slot = layout.slot(*index);
                assert!(slot >= group.first_slot && slot < group.first_slot + group.width());
            }
        }
    }

    #[test]
    fn unit_spans_the_axis_for_every_level_subset() {
        let levels = mixed_multiplicities();
        for count in 1..=levels.len() {
            let layout =
                GrotrianLayout::compute(&levels[..count]).expect("layout should exist");
            let expected_slots: usize = layout.groups.iter().map(|group| group.width() + 1).sum();
            assert_eq!(layout.total_slots, expected_slots);
            assert!((layout.unit * layout.total_slots as f64 - 100.0).abs() < 1.0e-9);
        }
    }

    #[test]
    fn layout_is_deterministic() {
        let levels = mixed_multiplicities();
        let first = GrotrianLayout::compute(&levels).expect("layout should exist");
        let second = GrotrianLayout::compute(&levels).expect("layout should exist");

        assert_eq!(first, second);
        for index in 0..levels.len() {
            assert_eq!(first.slot(index), second.slot(index));
        }
    }
}
