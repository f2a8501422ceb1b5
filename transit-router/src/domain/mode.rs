//! Travel modes and the transfer-aware segment cost model.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown mode name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown travel mode: {0}")]
pub struct InvalidMode(pub String);

/// A travel modality.
///
/// Each variant carries its own average speed and wait/preparation time,
/// so a typo in input data is rejected at parse time instead of silently
/// routing at walking speed.
///
/// # Examples
///
/// ```
/// use transit_router::domain::Mode;
///
/// let bus: Mode = "bus".parse().unwrap();
/// assert_eq!(bus, Mode::Bus);
/// assert_eq!(bus.speed(), 5.5);
/// assert!("boat".parse::<Mode>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Walk,
    Bike,
    Car,
    Bus,
    Subway,
}

impl Mode {
    /// All modes, in bit order.
    pub const ALL: [Mode; 5] = [Mode::Walk, Mode::Bike, Mode::Car, Mode::Bus, Mode::Subway];

    /// The single-bit mask for this mode.
    pub const fn bit(self) -> ModeMask {
        ModeMask(match self {
            Mode::Walk => 1 << 0,
            Mode::Bike => 1 << 1,
            Mode::Car => 1 << 2,
            Mode::Bus => 1 << 3,
            Mode::Subway => 1 << 4,
        })
    }

    /// Average speed in meters per second.
    pub const fn speed(self) -> f64 {
        match self {
            Mode::Walk => 1.4,
            Mode::Bike => 4.2,
            Mode::Car => 8.3,
            Mode::Bus => 5.5,
            Mode::Subway => 10.0,
        }
    }

    /// Average wait or preparation time in seconds (finding a bike,
    /// parking, waiting at a stop).
    pub const fn wait_time(self) -> f64 {
        match self {
            Mode::Walk => 0.0,
            Mode::Bike => 30.0,
            Mode::Car => 60.0,
            Mode::Bus => 300.0,
            Mode::Subway => 180.0,
        }
    }

    /// Whether edges of this mode can be travelled in both directions.
    ///
    /// Bus and subway model one-directional scheduled service.
    pub const fn is_bidirectional(self) -> bool {
        matches!(self, Mode::Walk | Mode::Bike | Mode::Car)
    }

    /// Lowercase name, as used in map data and requests.
    pub const fn as_str(self) -> &'static str {
        match self {
            Mode::Walk => "walk",
            Mode::Bike => "bike",
            Mode::Car => "car",
            Mode::Bus => "bus",
            Mode::Subway => "subway",
        }
    }

    /// Wait penalty for entering a segment in this mode, given how the
    /// previous segment was travelled.
    fn wait_penalty(
        self,
        prev_mode: Option<Mode>,
        prev_line: Option<&str>,
        current_line: Option<&str>,
    ) -> f64 {
        let switched = prev_mode != Some(self);
        let waits = match self {
            Mode::Walk => false,
            Mode::Bike | Mode::Car => switched,
            Mode::Bus | Mode::Subway => {
                switched || (current_line.is_some() && prev_line != current_line)
            }
        };

        if waits { self.wait_time() } else { 0.0 }
    }
}

impl FromStr for Mode {
    type Err = InvalidMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "walk" => Ok(Mode::Walk),
            "bike" => Ok(Mode::Bike),
            "car" => Ok(Mode::Car),
            "bus" => Ok(Mode::Bus),
            "subway" => Ok(Mode::Subway),
            other => Err(InvalidMode(other.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of modes, one bit per mode.
///
/// Permission checks between an edge and a query reduce to a single AND.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModeMask(u8);

impl ModeMask {
    pub const NONE: ModeMask = ModeMask(0);
    pub const ALL: ModeMask = ModeMask(0b1_1111);
    /// Walk, bike and car.
    pub const BIDIRECTIONAL: ModeMask = ModeMask(0b0_0111);

    /// Raw bits.
    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, mode: Mode) -> bool {
        self.0 & mode.bit().0 != 0
    }

    /// True if the two sets share at least one mode.
    pub const fn intersects(self, other: ModeMask) -> bool {
        self.0 & other.0 != 0
    }

    /// Member modes, in bit order.
    pub fn modes(self) -> impl Iterator<Item = Mode> {
        Mode::ALL.into_iter().filter(move |m| self.contains(*m))
    }
}

impl From<Mode> for ModeMask {
    fn from(mode: Mode) -> Self {
        mode.bit()
    }
}

impl FromIterator<Mode> for ModeMask {
    fn from_iter<I: IntoIterator<Item = Mode>>(iter: I) -> Self {
        iter.into_iter().fold(ModeMask::NONE, |mask, m| mask | m.bit())
    }
}

impl BitOr for ModeMask {
    type Output = ModeMask;

    fn bitor(self, rhs: Self) -> Self::Output {
        ModeMask(self.0 | rhs.0)
    }
}

impl BitOrAssign for ModeMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for ModeMask {
    type Output = ModeMask;

    fn bitand(self, rhs: Self) -> Self::Output {
        ModeMask(self.0 & rhs.0)
    }
}

impl fmt::Debug for ModeMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.modes().map(Mode::as_str).collect();
        write!(f, "ModeMask({})", names.join("|"))
    }
}

/// Parse mode names into a mask.
///
/// Unknown names are ignored: they set no bit and raise no error.
///
/// ```
/// use transit_router::domain::{Mode, parse_modes};
///
/// let mask = parse_modes(["walk", "bike", "hovercraft"]);
/// assert_eq!(mask, Mode::Walk.bit() | Mode::Bike.bit());
/// ```
pub fn parse_modes<I, S>(names: I) -> ModeMask
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .filter_map(|name| name.as_ref().parse::<Mode>().ok())
        .collect()
}

/// Modes of an edge that the query allows, in the edge's order.
pub fn filter_modes(edge_modes: &[Mode], allowed: ModeMask) -> Vec<Mode> {
    edge_modes
        .iter()
        .copied()
        .filter(|m| allowed.contains(*m))
        .collect()
}

/// Time to traverse a segment and the mode chosen for it.
///
/// Each candidate costs `distance / speed` plus a wait penalty:
/// - walking never waits;
/// - bike and car wait when switching into the mode (or on first use);
/// - bus and subway wait when switching into the mode, or when changing
///   onto a different non-empty line of the same mode.
///
/// The cheapest candidate wins; on a tie the earliest in `available` wins.
/// With no candidates the segment is walked, without a wait.
pub fn segment_time(
    distance: f64,
    available: &[Mode],
    prev_mode: Option<Mode>,
    prev_line: Option<&str>,
    current_line: Option<&str>,
) -> (f64, Mode) {
    let mut best: Option<(f64, Mode)> = None;

    for &mode in available {
        let total = distance / mode.speed() + mode.wait_penalty(prev_mode, prev_line, current_line);
        if best.is_none_or(|(best_time, _)| total < best_time) {
            best = Some((total, mode));
        }
    }

    best.unwrap_or((distance / Mode::Walk.speed(), Mode::Walk))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn parse_known_modes() {
        assert_eq!("walk".parse::<Mode>(), Ok(Mode::Walk));
        assert_eq!("subway".parse::<Mode>(), Ok(Mode::Subway));
        assert_eq!(
            "Walk".parse::<Mode>(),
            Err(InvalidMode("Walk".to_string()))
        );
    }

    #[test]
    fn bits_are_distinct() {
        let all: ModeMask = Mode::ALL.into_iter().collect();
        assert_eq!(all, ModeMask::ALL);
        assert_eq!(Mode::Walk.bit().bits(), 1);
        assert_eq!(Mode::Bike.bit().bits(), 2);
        assert_eq!(Mode::Car.bit().bits(), 4);
        assert_eq!(Mode::Bus.bit().bits(), 8);
        assert_eq!(Mode::Subway.bit().bits(), 16);
    }

    #[test]
    fn parse_modes_ignores_unknown() {
        assert_eq!(parse_modes(["boat", "teleport"]), ModeMask::NONE);
        assert_eq!(parse_modes(Vec::<String>::new()), ModeMask::NONE);
        assert_eq!(
            parse_modes(["car", "ferry", "bus"]),
            Mode::Car.bit() | Mode::Bus.bit()
        );
    }

    #[test]
    fn speed_and_wait_tables() {
        assert_eq!(Mode::Walk.speed(), 1.4);
        assert_eq!(Mode::Bike.speed(), 4.2);
        assert_eq!(Mode::Car.speed(), 8.3);
        assert_eq!(Mode::Bus.speed(), 5.5);
        assert_eq!(Mode::Subway.speed(), 10.0);

        assert_eq!(Mode::Walk.wait_time(), 0.0);
        assert_eq!(Mode::Bike.wait_time(), 30.0);
        assert_eq!(Mode::Car.wait_time(), 60.0);
        assert_eq!(Mode::Bus.wait_time(), 300.0);
        assert_eq!(Mode::Subway.wait_time(), 180.0);
    }

    #[test]
    fn bidirectional_mask_matches_modes() {
        let bidirectional: ModeMask = Mode::ALL
            .into_iter()
            .filter(|m| m.is_bidirectional())
            .collect();
        assert_eq!(bidirectional, ModeMask::BIDIRECTIONAL);
    }

    #[test]
    fn filter_preserves_edge_order() {
        let edge = [Mode::Subway, Mode::Walk, Mode::Bus];
        let allowed = Mode::Walk.bit() | Mode::Subway.bit();
        assert_eq!(filter_modes(&edge, allowed), vec![Mode::Subway, Mode::Walk]);
        assert!(filter_modes(&edge, Mode::Car.bit()).is_empty());
    }

    #[test]
    fn empty_candidates_fall_back_to_walking() {
        let (time, mode) = segment_time(140.0, &[], Some(Mode::Bus), None, None);
        assert_eq!(mode, Mode::Walk);
        assert!(approx_eq(time, 100.0));
    }

    #[test]
    fn walking_never_waits() {
        let (time, _) = segment_time(1400.0, &[Mode::Walk], Some(Mode::Car), None, None);
        assert!(approx_eq(time, 1000.0));
    }

    #[test]
    fn first_bike_use_pays_setup() {
        let (time, mode) = segment_time(420.0, &[Mode::Bike], None, None, None);
        assert_eq!(mode, Mode::Bike);
        assert!(approx_eq(time, 100.0 + 30.0));

        let (time, _) = segment_time(420.0, &[Mode::Bike], Some(Mode::Bike), None, None);
        assert!(approx_eq(time, 100.0));
    }

    #[test]
    fn same_bus_line_does_not_wait_again() {
        let (time, _) = segment_time(
            550.0,
            &[Mode::Bus],
            Some(Mode::Bus),
            Some("L1"),
            Some("L1"),
        );
        assert!(approx_eq(time, 100.0));
    }

    #[test]
    fn changing_bus_line_waits() {
        let (time, _) = segment_time(
            550.0,
            &[Mode::Bus],
            Some(Mode::Bus),
            Some("L1"),
            Some("L2"),
        );
        assert!(approx_eq(time, 100.0 + 300.0));
    }

    #[test]
    fn unnamed_line_after_named_line_does_not_wait() {
        let (time, _) = segment_time(1000.0, &[Mode::Subway], Some(Mode::Subway), Some("M1"), None);
        assert!(approx_eq(time, 100.0));
    }

    #[test]
    fn cheapest_candidate_wins() {
        // Short hop: walking beats paying the car setup.
        let (_, mode) = segment_time(100.0, &[Mode::Walk, Mode::Car], None, None, None);
        assert_eq!(mode, Mode::Walk);

        // Long hop: the car amortises its setup.
        let (time, mode) = segment_time(8300.0, &[Mode::Walk, Mode::Car], None, None, None);
        assert_eq!(mode, Mode::Car);
        assert!(approx_eq(time, 1000.0 + 60.0));
    }

    #[test]
    fn ties_resolve_to_first_candidate() {
        // 0m: every mode that does not wait costs zero.
        let (_, mode) = segment_time(0.0, &[Mode::Walk, Mode::Bike], Some(Mode::Bike), None, None);
        assert_eq!(mode, Mode::Walk);

        let (_, mode) = segment_time(0.0, &[Mode::Bike, Mode::Walk], Some(Mode::Bike), None, None);
        assert_eq!(mode, Mode::Bike);
    }

    #[test]
    fn mask_debug_lists_members() {
        let mask = Mode::Walk.bit() | Mode::Subway.bit();
        assert_eq!(format!("{:?}", mask), "ModeMask(walk|subway)");
    }

    #[test]
    fn mode_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Mode::Subway).unwrap(), "\"subway\"");
        let mode: Mode = serde_json::from_str("\"bike\"").unwrap();
        assert_eq!(mode, Mode::Bike);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn mode_name() -> impl Strategy<Value = &'static str> {
        prop::sample::select(vec!["walk", "bike", "car", "bus", "subway", "boat", ""])
    }

    fn any_mode() -> impl Strategy<Value = Mode> {
        prop::sample::select(Mode::ALL.to_vec())
    }

    fn line() -> impl Strategy<Value = Option<&'static str>> {
        prop::sample::select(vec![None, Some("L1"), Some("L2")])
    }

    proptest! {
        /// Permuting the names never changes the mask
        #[test]
        fn parse_modes_order_independent(
            (names, shuffled) in prop::collection::vec(mode_name(), 0..10)
                .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
        ) {
            prop_assert_eq!(parse_modes(&names), parse_modes(&shuffled));
        }

        /// Parsing the members of a mask yields the mask again
        #[test]
        fn parse_modes_idempotent(names in prop::collection::vec(mode_name(), 0..10)) {
            let mask = parse_modes(&names);
            let again = parse_modes(mask.modes().map(Mode::as_str));
            prop_assert_eq!(mask, again);
        }

        /// Continuing in the same mode on the same line never waits
        #[test]
        fn continuing_never_waits(
            mode in any_mode(),
            line in line(),
            distance in 0.0f64..50_000.0,
        ) {
            let (time, chosen) = segment_time(distance, &[mode], Some(mode), line, line);
            prop_assert_eq!(chosen, mode);
            prop_assert!((time - distance / mode.speed()).abs() < 1e-9);
        }

        /// Switching into a mode waits exactly that mode's wait time
        #[test]
        fn switching_waits_exactly_once(
            mode in any_mode(),
            prev in prop::option::of(any_mode()),
            prev_line in line(),
            line in line(),
            distance in 0.0f64..50_000.0,
        ) {
            prop_assume!(prev != Some(mode));
            let (time, _) = segment_time(distance, &[mode], prev, prev_line, line);
            let expected = distance / mode.speed() + mode.wait_time();
            prop_assert!((time - expected).abs() < 1e-9);
        }

        /// The chosen mode is always one of the candidates
        #[test]
        fn chosen_mode_is_a_candidate(
            modes in prop::collection::vec(any_mode(), 1..5),
            prev in prop::option::of(any_mode()),
            distance in 0.0f64..50_000.0,
        ) {
            let (time, chosen) = segment_time(distance, &modes, prev, None, None);
            prop_assert!(modes.contains(&chosen));
            prop_assert!(time >= 0.0);
        }
    }
}
