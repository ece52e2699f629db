//! Prompt assembly. Everything here is a pure function of its inputs.

use serde::{Deserialize, Serialize};

const DEFAULT_TRIP_DURATION: &str = "1-day";
const DEFAULT_BUDGET: &str = "Moderate";

/// Interest tags offered by the client, with the phrase used in prompts.
pub const INTEREST_PHRASES: &[(&str, &str)] = &[
    ("Temples & Shrines", "temples, shrines, religious sites"),
    ("Forts & Palaces", "historic forts, palaces, royal heritage"),
    ("Cultural Heritage", "cultural heritage, traditional arts"),
    ("Traditional Food", "local cuisine, street food, traditional dishes"),
    ("Museums & Art Galleries", "museums, art galleries, exhibitions"),
];

/// Budget tiers with their guidance sentence.
pub const BUDGET_GUIDANCE: &[(&str, &str)] = &[
    (
        "Budget Friendly",
        "Focus on attractions with low entry fees and local experiences (under ₹2,000/day).",
    ),
    (
        "Moderate",
        "Mix of popular attractions and comfortable options (₹2,000–₹5,000/day).",
    ),
    (
        "Luxury Experience",
        "Include premium hotels, experiences, and guided tours (above ₹5,000/day).",
    ),
];

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ItineraryRequest {
    pub city: String,

    #[serde(default = "default_trip_duration")]
    pub trip_duration: String,

    /// One of the [`BUDGET_GUIDANCE`] tiers. Anything else gets no guidance.
    #[serde(default = "default_budget")]
    pub budget: String,

    /// Required, may be empty.
    pub interests: Vec<String>,

    /// Free-text "lat,lon" of the traveller.
    #[serde(default)]
    pub location: Option<String>,
}

fn default_trip_duration() -> String {
    DEFAULT_TRIP_DURATION.to_string()
}

fn default_budget() -> String {
    DEFAULT_BUDGET.to_string()
}

impl ItineraryRequest {
    pub fn new(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            trip_duration: default_trip_duration(),
            budget: default_budget(),
            interests: vec![],
            location: None,
        }
    }
}

/// Descriptive phrase for an interest tag; unknown tags are returned as is.
pub fn interest_phrase(tag: &str) -> &str {
    INTEREST_PHRASES
        .iter()
        .find(|(known, _)| *known == tag)
        .map(|(_, phrase)| *phrase)
        .unwrap_or(tag)
}

pub fn interests_text(interests: &[String]) -> String {
    interests
        .iter()
        .map(|tag| interest_phrase(tag))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Guidance sentence for a budget tier, empty for unknown tiers.
pub fn budget_guidance(budget: &str) -> &'static str {
    BUDGET_GUIDANCE
        .iter()
        .find(|(tier, _)| *tier == budget)
        .map(|(_, guidance)| *guidance)
        .unwrap_or("")
}

pub fn location_sentence(location: Option<&str>) -> String {
    match location.filter(|l| !l.is_empty()) {
        Some(location) => format!("User is currently at latitude/longitude: {location}. "),
        None => String::new(),
    }
}

/// Query text embedded to find relevant monuments for a request.
pub fn retrieval_query(request: &ItineraryRequest) -> String {
    format!(
        "{} monuments, {} {}",
        request.city,
        interests_text(&request.interests),
        budget_guidance(&request.budget)
    )
}

/// Full itinerary prompt for the LLM.
pub fn compose(request: &ItineraryRequest, context: &[String]) -> String {
    format!(
        "
You are an expert India travel planner AI.
{location}
Use ONLY the monuments and details provided in the CONTEXT below to prepare the itinerary.

Context:
{context}

Create a detailed day-wise travel itinerary for a trip in {city}.
Trip Duration: {duration}
Interests: {interests}
Budget guidance: {budget}

Include:
  - Famous monuments (use only those in context when possible)
  - Suggested timings for visiting attractions
  - Local food and cultural experiences
  - Day-wise schedule

Respond in plain text with 'Day 1:', 'Day 2:', etc. Also list the monument entry fees and visiting hours where available from the context.
",
        location = location_sentence(request.location.as_deref()),
        context = context.join("\n"),
        city = request.city,
        duration = request.trip_duration,
        interests = interests_text(&request.interests),
        budget = budget_guidance(&request.budget),
    )
}

/// Prompt for a free-form travel question, used by `yatra query`.
pub fn compose_question(question: &str, context: &[String]) -> String {
    format!(
        "
You are an expert India travel itinerary planner.

Use ONLY the following context about monuments:

{context}

Now answer the user's question:

User Query: {question}

Provide a clear, accurate itinerary or travel guidance.
",
        context = context.join("\n"),
    )
}
