//! Mood-based trading guidance

/// Canned guidance for the trader's stated mood. Unknown moods get the
/// neutral line.
pub fn vibe_response(mood: &str) -> &'static str {
    match mood.trim().to_lowercase().as_str() {
        "revenge" => {
            "Let's take a step back. Revenge trades rarely work out. \
             Review your last signals and wait for a high-confidence setup."
        }
        "anxious" => {
            "Stay calm. Risk management is your friend. \
             Let's focus on signals with top confidence today."
        }
        "confident" => "Great energy! Stick to your lot cap and keep emotions in check. Let's go!",
        _ => "I'm here to guide you with balanced signals. Ask me for explanations anytime!",
    }
}
