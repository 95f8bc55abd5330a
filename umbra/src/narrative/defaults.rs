//! Built-in captions, shown until (or instead of) generated ones

use super::NarrativeEntry;
use crate::eclipse::Phase;

/// Built-in entry for a phase
pub fn builtin_entry(phase: Phase) -> NarrativeEntry {
    let (sentence, feeling, reflection) = match phase {
        Phase::Before => (
            "An ordinary afternoon hums along, the sun whole and unremarkable in a pale sky.",
            "calm, unaware, expectant",
            "What do you stop noticing simply because it is always there?",
        ),
        Phase::FirstContact => (
            "A small dark bite appears at the sun's edge, and the light begins to feel borrowed.",
            "curious, uneasy, alert",
            "When did you last notice something beginning before it had a name?",
        ),
        Phase::DuringPeak => (
            "Shadows sharpen and the air cools as the bright crescent thins toward a wire.",
            "hushed, tense, wondering",
            "What changes in you when the familiar starts to slip away?",
        ),
        Phase::Totality => (
            "The sun goes out, and a silver crown burns around a perfect hole in the sky.",
            "awe, stillness, reverence",
            "What is left when the light you rely on disappears?",
        ),
        Phase::ReturnOfLight => (
            "A single bead of sunlight flares at the rim, and the world exhales.",
            "relief, joy, gratitude",
            "What will you do differently now that you have seen the dark?",
        ),
        Phase::Afterglow => (
            "Daylight returns as if nothing happened, but the sky feels newly precious.",
            "tender, reflective, quiet",
            "How long will you carry the memory of this shadow?",
        ),
    };

    NarrativeEntry::new(sentence, feeling, reflection)
}
