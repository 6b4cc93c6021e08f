use crate::gesture::Gesture;
use thiserror::Error;

/// Sentinel emitted exactly once per transition into the no-hands state.
pub const NO_HANDS_LINE: &str = "No hands detected.";

/// Field separator for hand-state lines.
const FIELD_SEPARATOR: char = '|';

/// One side of a status line. `position` is the wrist pixel coordinate in
/// the flipped image space; it is absent on the wire when the tracker had
/// no fix for that hand, and absence must survive a round trip (it never
/// collapses to `(0, 0)`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandReport {
    pub gesture: Gesture,
    pub position: Option<(i32, i32)>,
}

impl HandReport {
    pub fn new(gesture: Gesture, x: i32, y: i32) -> Self {
        Self {
            gesture,
            position: Some((x, y)),
        }
    }
}

/// The two-hand state carried by one status line. `None` means that side
/// was not detected this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusUpdate {
    pub left: Option<HandReport>,
    pub right: Option<HandReport>,
}

impl StatusUpdate {
    pub fn has_hands(&self) -> bool {
        self.left.is_some() || self.right.is_some()
    }

    /// Encode into the wire line. Field order is fixed (left side first,
    /// gesture before coordinates) so that semantically equal states always
    /// produce byte-identical lines; the tracker's duplicate suppression
    /// depends on that.
    pub fn encode(&self) -> String {
        if !self.has_hands() {
            return NO_HANDS_LINE.to_string();
        }

        let mut parts: Vec<String> = Vec::with_capacity(6);
        encode_side("L", &self.left, &mut parts);
        encode_side("R", &self.right, &mut parts);
        parts.join("|")
    }
}

fn encode_side(prefix: &str, side: &Option<HandReport>, parts: &mut Vec<String>) {
    match side {
        Some(report) => {
            parts.push(format!("{}_Gesture:{}", prefix, report.gesture.as_str()));
            if let Some((x, y)) = report.position {
                parts.push(format!("{}_X:{}", prefix, x));
                parts.push(format!("{}_Y:{}", prefix, y));
            }
        }
        None => parts.push(format!("{}_Gesture:No Hand", prefix)),
    }
}

/// Pre-mapped action lines, the simplified producer variant that transmits
/// decisions instead of raw gesture and position data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    PlayResume,
    Pause,
    VolumeUp,
    VolumeDown,
    SpeedUp,
    SlowDown,
    NoAction,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::PlayResume => "Play/Resume",
            Action::Pause => "Pause",
            Action::VolumeUp => "Volume Up",
            Action::VolumeDown => "Volume Down",
            Action::SpeedUp => "Speed Up",
            Action::SlowDown => "Slow Down",
            Action::NoAction => "No Action",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Play/Resume" => Some(Action::PlayResume),
            "Pause" => Some(Action::Pause),
            "Volume Up" => Some(Action::VolumeUp),
            "Volume Down" => Some(Action::VolumeDown),
            "Speed Up" => Some(Action::SpeedUp),
            "Slow Down" => Some(Action::SlowDown),
            "No Action" => Some(Action::NoAction),
            _ => None,
        }
    }

    pub fn encode(&self) -> String {
        format!("Action:{}", self.as_str())
    }
}

/// Every message the producer can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    Hands(StatusUpdate),
    Action(Action),
    NoHands,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("empty line")]
    Empty,

    #[error("line has no _Gesture marker: {0}")]
    MissingGestureMarker(String),

    #[error("malformed field: {0}")]
    MalformedField(String),

    #[error("missing {0}_Gesture field")]
    MissingGestureField(&'static str),

    #[error("bad coordinate value: {0}")]
    BadCoordinate(String),

    #[error("unknown action: {0}")]
    UnknownAction(String),
}

/// Parse one producer line. A line where both sides resolve to `No Hand`
/// is treated as the explicit sentinel.
pub fn parse_line(line: &str) -> Result<Line, ProtocolError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ProtocolError::Empty);
    }
    if line == NO_HANDS_LINE {
        return Ok(Line::NoHands);
    }
    if let Some(name) = line.strip_prefix("Action:") {
        let name = name.trim();
        return Action::from_label(name)
            .map(Line::Action)
            .ok_or_else(|| ProtocolError::UnknownAction(name.to_string()));
    }
    if !line.contains("_Gesture:") {
        return Err(ProtocolError::MissingGestureMarker(line.to_string()));
    }

    let mut fields = SideFields::default();
    for part in line.split(FIELD_SEPARATOR) {
        let (key, value) = part
            .split_once(':')
            .ok_or_else(|| ProtocolError::MalformedField(part.to_string()))?;
        fields.set(key.trim(), value.trim())?;
    }

    let left = decode_side("L", fields.l_gesture, fields.l_x, fields.l_y)?;
    let right = decode_side("R", fields.r_gesture, fields.r_x, fields.r_y)?;

    let update = StatusUpdate { left, right };
    if !update.has_hands() {
        return Ok(Line::NoHands);
    }
    Ok(Line::Hands(update))
}

/// Convenience wrapper for callers that only care about hand-state data and
/// want the parser's "no data" contract: malformed lines, the sentinel, and
/// all-absent lines all come back as `None`.
pub fn parse_status(line: &str) -> Option<StatusUpdate> {
    match parse_line(line) {
        Ok(Line::Hands(update)) => Some(update),
        _ => None,
    }
}

#[derive(Default)]
struct SideFields<'a> {
    l_gesture: Option<&'a str>,
    l_x: Option<&'a str>,
    l_y: Option<&'a str>,
    r_gesture: Option<&'a str>,
    r_x: Option<&'a str>,
    r_y: Option<&'a str>,
}

impl<'a> SideFields<'a> {
    fn set(&mut self, key: &'a str, value: &'a str) -> Result<(), ProtocolError> {
        let slot = match key {
            "L_Gesture" => &mut self.l_gesture,
            "L_X" => &mut self.l_x,
            "L_Y" => &mut self.l_y,
            "R_Gesture" => &mut self.r_gesture,
            "R_X" => &mut self.r_x,
            "R_Y" => &mut self.r_y,
            _ => return Err(ProtocolError::MalformedField(key.to_string())),
        };
        *slot = Some(value);
        Ok(())
    }
}

fn decode_side(
    side: &'static str,
    gesture: Option<&str>,
    x: Option<&str>,
    y: Option<&str>,
) -> Result<Option<HandReport>, ProtocolError> {
    let label = gesture.ok_or(ProtocolError::MissingGestureField(side))?;
    let gesture = Gesture::from_label(label);
    if gesture == Gesture::NoHand {
        return Ok(None);
    }

    let position = match (decode_coord(x)?, decode_coord(y)?) {
        (Some(x), Some(y)) => Some((x, y)),
        _ => None,
    };

    Ok(Some(HandReport { gesture, position }))
}

/// A missing field or the literal `None` token both mean "no position".
fn decode_coord(value: Option<&str>) -> Result<Option<i32>, ProtocolError> {
    match value {
        None | Some("None") => Ok(None),
        Some(raw) => raw
            .parse::<i32>()
            .map(Some)
            .map_err(|_| ProtocolError::BadCoordinate(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn both_hands() -> StatusUpdate {
        StatusUpdate {
            left: Some(HandReport::new(Gesture::ThreeFingers, 120, 340)),
            right: Some(HandReport::new(Gesture::OpenHand, 510, 220)),
        }
    }

    #[test]
    fn test_encode_both_hands() {
        let line = both_hands().encode();
        assert_eq!(
            line,
            "L_Gesture:Three Fingers|L_X:120|L_Y:340|R_Gesture:Open Hand|R_X:510|R_Y:220"
        );
    }

    #[test]
    fn test_encode_left_only_has_no_right_coords() {
        let update = StatusUpdate {
            left: Some(HandReport::new(Gesture::ClosedFist, 33, 44)),
            right: None,
        };
        assert_eq!(
            update.encode(),
            "L_Gesture:Closed Fist|L_X:33|L_Y:44|R_Gesture:No Hand"
        );
    }

    #[test]
    fn test_encode_no_hands_is_sentinel() {
        assert_eq!(StatusUpdate::default().encode(), NO_HANDS_LINE);
    }

    #[test]
    fn test_round_trip_both_hands() {
        let update = both_hands();
        assert_eq!(parse_line(&update.encode()), Ok(Line::Hands(update)));
    }

    #[test]
    fn test_round_trip_single_hand() {
        let update = StatusUpdate {
            left: None,
            right: Some(HandReport::new(Gesture::TwoFingers, 0, 0)),
        };
        assert_eq!(parse_line(&update.encode()), Ok(Line::Hands(update)));
    }

    #[test]
    fn test_absent_position_parses_to_none_not_zero() {
        let update = StatusUpdate {
            left: Some(HandReport {
                gesture: Gesture::OpenHand,
                position: None,
            }),
            right: None,
        };
        let parsed = parse_status(&update.encode()).unwrap();
        assert_eq!(parsed.left.unwrap().position, None);
    }

    #[test]
    fn test_literal_none_coordinate_parses_to_absent() {
        let parsed =
            parse_status("L_Gesture:Open Hand|L_X:None|L_Y:None|R_Gesture:No Hand").unwrap();
        assert_eq!(parsed.left.unwrap().position, None);
    }

    #[test]
    fn test_sentinel_parses_to_no_hands() {
        assert_eq!(parse_line(NO_HANDS_LINE), Ok(Line::NoHands));
    }

    #[test]
    fn test_both_sides_no_hand_is_equivalent_to_sentinel() {
        assert_eq!(
            parse_line("L_Gesture:No Hand|R_Gesture:No Hand"),
            Ok(Line::NoHands)
        );
        assert_eq!(parse_status("L_Gesture:No Hand|R_Gesture:No Hand"), None);
    }

    #[test]
    fn test_rejects_line_without_gesture_marker() {
        assert!(matches!(
            parse_line("Hand: Right | Motion: Moving Up"),
            Err(ProtocolError::MissingGestureMarker(_))
        ));
    }

    #[test]
    fn test_rejects_malformed_delimiters() {
        assert!(matches!(
            parse_line("L_Gesture:Open Hand|garbage"),
            Err(ProtocolError::MalformedField(_))
        ));
    }

    #[test]
    fn test_rejects_bad_coordinate() {
        assert!(matches!(
            parse_line("L_Gesture:Open Hand|L_X:12a|L_Y:9|R_Gesture:No Hand"),
            Err(ProtocolError::BadCoordinate(_))
        ));
        assert_eq!(
            parse_status("L_Gesture:Open Hand|L_X:12a|L_Y:9|R_Gesture:No Hand"),
            None
        );
    }

    #[test]
    fn test_rejects_empty_line() {
        assert_eq!(parse_line("   "), Err(ProtocolError::Empty));
    }

    #[test]
    fn test_action_round_trip_all_variants() {
        let actions = [
            Action::PlayResume,
            Action::Pause,
            Action::VolumeUp,
            Action::VolumeDown,
            Action::SpeedUp,
            Action::SlowDown,
            Action::NoAction,
        ];
        for action in actions {
            assert_eq!(parse_line(&action.encode()), Ok(Line::Action(action)));
        }
    }

    #[test]
    fn test_unknown_action_rejected() {
        assert!(matches!(
            parse_line("Action:Rewind"),
            Err(ProtocolError::UnknownAction(_))
        ));
    }

    #[test]
    fn test_equal_states_encode_identically() {
        let a = both_hands();
        let b = StatusUpdate {
            right: Some(HandReport::new(Gesture::OpenHand, 510, 220)),
            left: Some(HandReport::new(Gesture::ThreeFingers, 120, 340)),
        };
        assert_eq!(a.encode(), b.encode());
    }
}
