//! Patient profiles shown above each chat.
//!
//! Profiles are plain immutable values; each panel receives its own copy at
//! construction.

use serde::{Deserialize, Serialize};

/// A labelled demographic fact (e.g. `Age: 45`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Demographic {
    /// Field label.
    pub label: String,
    /// Field value.
    pub value: String,
}

impl Demographic {
    fn new(label: &str, value: &str) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// A simulated patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Full name.
    pub name: String,
    /// Demographic facts, in display order.
    pub demographics: Vec<Demographic>,
    /// Personality and communication style.
    pub personality: Vec<String>,
    /// Medical background.
    pub medical: Vec<String>,
    /// Past interactions with the doctor.
    pub past: Vec<String>,
    /// Challenges and concerns.
    pub challenges: Vec<String>,
    /// A question this patient might ask.
    pub example: String,
    /// Reply used when no canned question matches.
    pub default_response: String,
}

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

impl Profile {
    /// First word of the name, used as the chat sender label.
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }

    /// Title shown above the chat, e.g. `Sarah's Chat with Ava`.
    pub fn chat_title(&self) -> String {
        format!("{}'s Chat with {}", self.first_name(), crate::ASSISTANT_NAME)
    }

    /// Sarah Martinez, the left-hand patient.
    pub fn sarah() -> Self {
        Self {
            name: "Sarah Martinez".into(),
            demographics: vec![
                Demographic::new("Age", "45"),
                Demographic::new("Gender", "Female"),
                Demographic::new("Location", "Austin, Texas, USA"),
                Demographic::new("Occupation", "Elementary school teacher"),
                Demographic::new(
                    "Family",
                    "Divorced, primary caregiver to two children (ages 12 and 15) and elderly mother",
                ),
            ],
            personality: lines(&[
                "Anxious, underconfident, but principled",
                "Feels overwhelmed by responsibilities",
                "Prefers empathetic, reassuring, and slower-paced conversations",
                "Appreciates when information is broken down into simple terms",
                "Needs emotional support and encouragement to ask follow-up questions",
            ]),
            medical: lines(&[
                "Diagnosed with Stage I breast cancer 9 months ago",
                "Underwent lumpectomy and radiation therapy",
                "Currently on hormone therapy, dealing with side effects like fatigue and mood swings",
            ]),
            past: lines(&[
                "Hesitant to ask too many questions for fear of 'bothering' the doctor",
                "Needs reassurance that she is making the right treatment decisions",
            ]),
            challenges: lines(&[
                "Worries about how her illness affects her children emotionally",
                "Financial stress due to missed work and medical bills",
            ]),
            example: "Doctor, I've been feeling so tired lately, and I'm worried it's a sign \
                      the cancer might be coming back. Could it just be the medication? And... \
                      how can I explain all this to my kids without scaring them?"
                .into(),
            default_response:
                "I'm here for you, Sarah. Could you tell me a bit more about what's on your mind?"
                    .into(),
        }
    }

    /// Michael Thompson, the right-hand patient.
    pub fn michael() -> Self {
        Self {
            name: "Michael Thompson".into(),
            demographics: vec![
                Demographic::new("Age", "52"),
                Demographic::new("Gender", "Male"),
                Demographic::new("Location", "Boston, Massachusetts, USA"),
                Demographic::new(
                    "Occupation",
                    "Senior Financial Analyst at a major investment bank",
                ),
                Demographic::new("Family", "Married with two adult children"),
            ],
            personality: lines(&[
                "Reassured, confident, objective, practical",
                "Highly data-driven and analytical",
                "Prefers structured conversations and evidence-based explanations",
                "Values efficiency and directness in communication",
            ]),
            medical: lines(&[
                "Diagnosed with Stage II colorectal cancer 18 months ago",
                "Underwent surgery and chemotherapy",
                "Currently in remission but on quarterly follow-up",
            ]),
            past: lines(&[
                "Always arrives prepared with spreadsheets of lab results and medical history",
                "Asks for clinical trial data and statistical outcomes",
            ]),
            challenges: lines(&[
                "Balances demanding work schedule with medical appointments",
                "Concerned about long-term recurrence risk",
            ]),
            example: "Doctor, based on the last CEA trend and your experience, what's the \
                      statistical likelihood of recurrence in my case over the next five years? \
                      Could you also share any peer-reviewed studies supporting lifestyle \
                      interventions for reducing that risk?"
                .into(),
            default_response: "Michael, I can look that up or summarize the latest data if \
                               you'd like. Could you clarify your question?"
                .into(),
        }
    }

    /// Titled sections of the profile card, in display order.
    pub fn sections(&self) -> Vec<(&'static str, Vec<String>)> {
        let demographics = self
            .demographics
            .iter()
            .map(|d| format!("{}: {}", d.label, d.value))
            .collect();
        vec![
            ("Demographics", demographics),
            ("Personality & Communication Style", self.personality.clone()),
            ("Medical Background", self.medical.clone()),
            ("Past Interactions with Doctor", self.past.clone()),
            ("Challenges & Concerns", self.challenges.clone()),
        ]
    }
}
