//! Static first-aid and wellness tip data.

/// The fixed, ordered tip list shown by the first-aid menu action.
pub const FIRST_AID_TIPS: [&str; 8] = [
    "\u{1fa79} For small cuts, rinse with clean water and apply antiseptic.",
    "\u{1f525} For minor burns, hold under cool running water for 10 minutes.",
    "\u{1f912} For fever, rest well and drink plenty of fluids.",
    "\u{1f6b6}\u{200d}\u{2640}\u{fe0f} Walk for at least 30 minutes daily to improve heart health.",
    "\u{1f9f4} Use sunscreen when outdoors to prevent sunburn.",
    "\u{1f9d8}\u{200d}\u{2642}\u{fe0f} Practice deep breathing or yoga to reduce stress.",
    "\u{1f4a7} Stay hydrated — aim for 8 glasses of water daily.",
    "\u{1f9fc} Wash hands frequently to prevent infections.",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eight_tips() {
        assert_eq!(FIRST_AID_TIPS.len(), 8);
    }

    #[test]
    fn test_tips_are_nonempty() {
        for tip in FIRST_AID_TIPS {
            assert!(!tip.trim().is_empty());
        }
    }
}
