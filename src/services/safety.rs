/// Emergency vocabulary, English and Filipino. Any hit overrides all other routing.
const DANGER_WORDS: &[&str] = &[
    "blood",
    "bleeding",
    "hemorrhage",
    "seizure",
    "convulsion",
    "unconscious",
    "unresponsive",
    "collapse",
    "collapsed",
    "poison",
    "poisoned",
    "toxic",
    "chocolate",
    "xylitol",
    "can't breathe",
    "not breathing",
    "difficulty breathing",
    "pale gums",
    "blue gums",
    "broken bone",
    "fracture",
    "dugo",
    "nagdudugo",
    "lason",
    "nalason",
    "hindi humihinga",
    "hindi makahinga",
    "nanghihina",
    "nalaglag",
    "namatay",
    "dying",
    "die",
];

pub const EMERGENCY_REPLY: &str = "🚨 EMERGENCY ALERT: Critical symptoms detected. \
Do not wait — bring your pet to the clinic IMMEDIATELY \
or contact an emergency veterinarian right away. \
Time is critical for conditions involving bleeding, seizures, \
poisoning, or loss of consciousness.";

/// The first emergency keyword found in `text`, case-insensitively.
pub fn check_safety(text: &str) -> Option<&'static str> {
    // Sanitized input carries apostrophes as entities.
    let lower = text.to_lowercase().replace("&#x27;", "'");
    DANGER_WORDS.iter().copied().find(|w| lower.contains(w))
}
