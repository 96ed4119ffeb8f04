use crate::models::{Slots, Stage};

pub const DATETIME_FORMAT_HINT: &str = "Format: MM/DD/YYYY HH:MM AM/PM (e.g. 03/20/2026 10:00 AM)";

pub const SERVICE_MENU: &str = "What service do you need?\n\n\
• Consultation\n• Vaccination\n• Spay & Neuter\n• Deworming\n• Grooming";

pub const ANIMAL_QUESTION: &str =
    "What type of animal is your pet?\n(e.g. Dog, Cat, Rabbit, Bird, Horse…)";

pub const ACCEPTED_SPECIES: &str = "We accept: Dogs, Cats, Rabbits, Hamsters, Turtles, Birds, \
Cows, Hens, Pigs, Goats, Sheep, Horses, Ducks, Buffalos, Cattle, Donkeys, and Mules.";

pub const BOOKING_CANCELLED: &str = "No problem! Booking cancelled. How else can I help you? 🐾";

/// The question for `stage`, phrased to follow the back-to-booking lead-in.
pub fn resume_prompt(stage: Stage, slots: &Slots) -> String {
    match stage {
        Stage::AskService => "what service do you need? \
(Consultation, Vaccination, Spay & Neuter, Deworming, Grooming)"
            .to_string(),
        Stage::AskAnimal => "what type of animal is your pet?".to_string(),
        Stage::AskBreed => {
            let animal = slots
                .animal
                .map(|a| a.as_str().to_lowercase())
                .unwrap_or_else(|| "pet".to_string());
            format!("what breed is your {animal}?")
        }
        Stage::AskPetName => "what's your pet's name?".to_string(),
        Stage::AskDatetime => {
            "what date and time works for you? (e.g. 03/20/2026 10:00 AM)".to_string()
        }
        Stage::Confirm => "please type 'confirm' to finalize or 'cancel' to start over.".to_string(),
        Stage::Idle | Stage::Done => "how can I help you?".to_string(),
    }
}

pub fn ask_datetime(opening: &str, hours: &str) -> String {
    format!(
        "{opening}\n\nWhen would you like to schedule the appointment?\n\
         {DATETIME_FORMAT_HINT}\n\nOur clinic is open {hours}."
    )
}

pub fn ask_breed(animal: &str) -> String {
    format!("What breed is your {}? (Type 'unknown' if not sure)", animal.to_lowercase())
}

/// Bullet summary of everything collected so far.
pub fn summary(slots: &Slots) -> String {
    let field = |v: Option<String>| v.unwrap_or_else(|| "-".to_string());
    format!(
        "• Service:   {}\n• Animal:    {}\n• Pet Name:  {}\n• Date/Time: {}",
        field(slots.service.map(|s| s.to_string())),
        field(slots.species_label()),
        field(slots.pet_name.clone()),
        field(slots.datetime.as_ref().map(|d| d.display())),
    )
}

pub fn confirm_request(heading: &str, slots: &Slots) -> String {
    format!(
        "{heading}\n\n{}\n\nType 'confirm' to book, or 'cancel' to start over.",
        summary(slots)
    )
}

pub fn back_to_booking(aside: &str, stage: Stage, slots: &Slots) -> String {
    format!("{aside}\n\nNow, back to your booking — {}", resume_prompt(stage, slots))
}
