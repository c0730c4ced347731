//! Canonical reference data seeded at startup.
//!
//! Question order in this table is the order the form renders in, so rows
//! may only be appended; reordering would renumber live answers.

use crate::domain::{EventDay, MealType};

/// Application form questions as `(label, required)` pairs.
pub(crate) const DEFAULT_QUESTIONS: &[(&str, bool)] = &[
    ("First Name", true),
    ("Last Name", true),
    ("Email", true),
    ("Phone Number", true),
    ("Country", true),
    ("School Name", true),
    ("Major", true),
    ("Current Level of Study", true),
    ("Expected Graduation Year", true),
    ("Age", true),
    ("Gender", true),
    ("Race/Ethnicity", true),
    ("Part of the LGBTQ+ Community", true),
    ("Person with Disabilities?", true),
    ("Hackathon Count?", true),
    ("Github", false),
    ("LinkedIn", false),
    ("Portfolio", false),
    ("Attach Your Resume", true),
    ("UI/UX Design", false),
    ("Frontend Development", false),
    ("Backend Development", false),
    ("Fullstack Development", false),
    ("Project Management", false),
    ("Web, Crypto, Blockchain", false),
    ("Cybersecurity", false),
    ("Machine Learning", false),
    ("Dietary Restrictions", true),
    ("T-Shirt Size", true),
    ("MLH Code of Conduct", true),
    (
        "MLH Privacy Policy, MLH Contest Terms and Conditions",
        true,
    ),
    ("MLH Event Communication", false),
    ("Hack the Valley Consent Form Agreement", true),
];

/// Meal slots for the event weekend. All start inactive; stations are
/// opened by hand when service begins.
pub(crate) const DEFAULT_MEALS: &[(EventDay, MealType)] = &[
    (EventDay::Friday, MealType::Dinner),
    (EventDay::Saturday, MealType::Breakfast),
    (EventDay::Saturday, MealType::Lunch),
    (EventDay::Saturday, MealType::Dinner),
    (EventDay::Sunday, MealType::Breakfast),
    (EventDay::Sunday, MealType::Lunch),
];
