// Scripted chat assistant
// Deterministic responder over a fixed response table: direct keyword containment
// is tried first in declaration order, then a prioritized list of question
// patterns, then the default handoff message. Matching is case-insensitive via
// lowercasing the incoming text.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

// Opening message seeded into every conversation
pub const GREETING: &str = "Hello! Welcome to Talek Bush Camp. I'm here to help you with bookings, safari arrangements, and any questions about our camp. How can I assist you today?";

// Suggested first questions, each phrased to hit its response key directly
pub const QUICK_REPLIES: [&str; 5] = [
    "Check availability",
    "Safari packages",
    "Airport transfer",
    "Pricing information",
    "Contact manager",
];

// Keyed responses, scanned in this order for direct containment matches
const RESPONSES: [(&str, &str); 20] = [
    (
        "check availability",
        "I'd be happy to check availability for you! Please let me know your preferred check-in and check-out dates, and the number of guests.",
    ),
    (
        "safari packages",
        "We offer various safari packages including full-day game drives, cultural village tours, and photography safaris. Prices start from $80 per person. Would you like specific details?",
    ),
    (
        "airport transfer",
        "We provide airport transfer services from Ol Kiombo Airport (16km away) for $50 per vehicle. Our managers Abdul and Mustafa can arrange this for you.",
    ),
    (
        "pricing information",
        "Our accommodation rates: Safari Tent from $120/night, Cottage from $150/night, Family Room from $250/night. All include breakfast and basic amenities.",
    ),
    (
        "contact manager",
        "You can reach our managers directly: Abdul (+254 123 456 789) specializes in safari arrangements, and Mustafa handles guest services. They're available 24/7.",
    ),
    (
        "location",
        "Talek Bush Camp is located in the heart of the Maasai Mara National Reserve in Kenya, right on the banks of the Talek River. We're just 5km from the main Talek Gate entrance to the reserve.",
    ),
    (
        "directions",
        "From Nairobi, you can reach us by road (approximately 5-6 hours) or by flight to Ol Kiombo Airstrip (16km from our camp). We offer airport pickup services and can provide detailed driving directions upon request.",
    ),
    (
        "accommodation",
        "We offer various accommodation options including Safari Tents, Cottages, and Family Rooms. All units feature comfortable beds with mosquito nets, private bathrooms with hot water, and verandas overlooking the bush.",
    ),
    (
        "rooms",
        "Our rooms include Safari Tents (perfect for couples), Cottages (with extra space and privacy), and Family Rooms (accommodating up to 5 people). All accommodations are tastefully decorated with local crafts and modern amenities.",
    ),
    (
        "facilities",
        "Our camp facilities include a restaurant serving international and local cuisine, a bar with panoramic views, free Wi-Fi in common areas, a gift shop, and a relaxation area overlooking the Talek River.",
    ),
    (
        "activities",
        "At Talek Bush Camp, you can enjoy game drives, guided nature walks, cultural visits to Maasai villages, bird watching, bush breakfasts, sundowners, and evening campfires with Maasai warriors sharing stories.",
    ),
    (
        "game drives",
        "We offer morning, afternoon, and full-day game drives in custom-designed 4x4 safari vehicles with experienced guides. The Maasai Mara is home to the Big Five and hosts the Great Migration from July to October.",
    ),
    (
        "cultural",
        "Experience authentic Maasai culture through village visits where you can learn about traditional customs, participate in dances, and purchase handcrafted souvenirs directly from local artisans.",
    ),
    (
        "weather",
        "The Maasai Mara enjoys pleasant weather year-round. Daytime temperatures typically range from 25-30°C (77-86°F), while nights can be cooler at 10-15°C (50-59°F). The rainy seasons are typically April-May and November.",
    ),
    (
        "what to pack",
        "We recommend packing light, neutral-colored clothing, a warm jacket for evenings, comfortable walking shoes, sun protection (hat, sunglasses, sunscreen), insect repellent, binoculars, and a camera with extra batteries.",
    ),
    (
        "internet",
        "We provide free Wi-Fi in the main areas of the camp. However, please note that due to our remote location, the connection may sometimes be slow or intermittent.",
    ),
    (
        "conservation",
        "Talek Bush Camp is committed to sustainable tourism. We employ local staff, use solar power, practice water conservation, minimize waste, and contribute to local conservation initiatives protecting the Mara ecosystem.",
    ),
    (
        "wildlife",
        "The Maasai Mara is home to incredible wildlife including lions, elephants, buffalos, leopards, rhinos, giraffes, zebras, and numerous antelope species. From July to October, witness the spectacular wildebeest migration.",
    ),
    (
        "special occasions",
        "We can arrange special celebrations such as bush dinners, honeymoon packages, birthday surprises, and anniversary events. Please contact us in advance to organize these memorable experiences.",
    ),
    (
        "children",
        "Children are welcome at Talek Bush Camp! We offer family-friendly accommodations, special meal options for kids, and tailored activities that introduce young ones to wildlife and Maasai culture in a safe environment.",
    ),
];

// Handoff message when nothing matches
const DEFAULT_RESPONSE: &str = "Thank you for your message! I'm here to help with any questions about Talek Bush Camp. For immediate assistance, please call us at +254 741 219 994 or email info@talekbushcamp.com. Our team will respond shortly.";

// Question patterns, most specific first. Input is lowercased before matching
// so the patterns are written in lowercase.
const QUESTION_PATTERNS: [(&str, &str); 19] = [
    (
        "safari package|tour package|package deal|package offer",
        "safari packages",
    ),
    (
        "price|cost|rate|fee|charge|how much( does it cost| is it)?|pricing",
        "pricing information",
    ),
    (
        "airport (transfer|pickup|shuttle)|transfer (from|to) airport|pickup (from|at) airport",
        "airport transfer",
    ),
    (
        "check (availability|dates)|book|reservation|available|when can i|when is it available",
        "check availability",
    ),
    (
        "manager|contact person|speak (with|to) someone|talk to|call|phone number",
        "contact manager",
    ),
    (
        "how (can|do|would) (i|we) get (to|there)|directions to|travel to|journey to|route to|from .* to|getting (to|there)",
        "directions",
    ),
    (
        "where is|location of|address|situated|find|how to (get|reach|arrive)",
        "location",
    ),
    (
        "room type|accommodation type|place to stay|lodge|tent|cottage|sleep|bed",
        "accommodation",
    ),
    (
        "facilities|amenities|offer|provide|service|feature|what('s| is) (available|included)",
        "facilities",
    ),
    (
        "activity|activities|things to do|experience|entertainment|tour|excursion",
        "activities",
    ),
    (
        "game drive|safari ride|wildlife tour|animal viewing|see animals",
        "game drives",
    ),
    (
        "maasai|masai|tribe|cultural|village|local people|tradition|indigenous",
        "cultural",
    ),
    (
        "weather|climate|temperature|season|when to visit|best time",
        "weather",
    ),
    (
        "pack|bring|luggage|suitcase|clothes|clothing|wear|what should i bring",
        "what to pack",
    ),
    (
        "wifi|wi-fi|internet|connection|online|network|connectivity",
        "internet",
    ),
    (
        "conservation|sustainable|environment|eco(-friendly)?|green|responsible",
        "conservation",
    ),
    (
        "animal|wildlife|big five|migration|lion|elephant|buffalo|leopard|rhino|zebra|giraffe",
        "wildlife",
    ),
    (
        "birthday|anniversary|honeymoon|celebration|special occasion|romantic",
        "special occasions",
    ),
    (
        "child|children|kid|family|young|baby|infant|toddler",
        "children",
    ),
];

static PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    QUESTION_PATTERNS
        .iter()
        .map(|(pattern, key)| {
            let regex = Regex::new(pattern).expect("valid chat pattern");
            (regex, *key)
        })
        .collect()
});

fn response_text(key: &str) -> &'static str {
    RESPONSES
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, response)| *response)
        .unwrap_or(DEFAULT_RESPONSE)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ChatResponder;

impl ChatResponder {
    pub fn new() -> Self {
        Self
    }

    // The response key for a message, or "default" when nothing matches
    pub fn answer_key(&self, message: &str) -> &'static str {
        let message = message.to_lowercase();

        for &(key, _) in RESPONSES.iter() {
            if message.contains(key) {
                return key;
            }
        }
        for (pattern, key) in PATTERNS.iter() {
            if pattern.is_match(&message) {
                return *key;
            }
        }
        "default"
    }

    pub fn response_for(&self, message: &str) -> &'static str {
        response_text(self.answer_key(message))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: u64,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ChatConfig {
    // Simulated typing pause before the bot reply lands; zero in tests
    pub typing_delay: Duration,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            typing_delay: Duration::from_millis(1500),
        }
    }
}

// A single guest conversation. Starts with the greeting already posted and
// appends a user/bot pair per exchange.
pub struct ChatSession {
    responder: ChatResponder,
    config: ChatConfig,
    messages: Vec<ChatMessage>,
    next_id: u64,
}

impl ChatSession {
    pub fn new(config: ChatConfig) -> Self {
        let mut session = Self {
            responder: ChatResponder::new(),
            config,
            messages: Vec::new(),
            next_id: 1,
        };
        session.push(GREETING.to_string(), Sender::Bot);
        session
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    // Quick replies are offered until the guest has said something
    pub fn show_quick_replies(&self) -> bool {
        self.messages.len() == 1
    }

    // Post a guest message and produce the bot reply. Blank input is ignored.
    pub async fn send(&mut self, text: &str) -> Option<&ChatMessage> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }

        self.push(trimmed.to_string(), Sender::User);
        sleep(self.config.typing_delay).await;

        let key = self.responder.answer_key(trimmed);
        debug!(%key, "chat reply selected");
        self.push(response_text(key).to_string(), Sender::Bot);
        self.messages.last()
    }

    fn push(&mut self, text: String, sender: Sender) {
        self.messages.push(ChatMessage {
            id: self.next_id,
            text,
            sender,
            timestamp: Utc::now(),
        });
        self.next_id += 1;
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new(ChatConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Where is Talek Bush Camp located?", "location"; "where located")]
    #[test_case("How do I get to your camp from Nairobi?", "directions"; "from nairobi")]
    #[test_case("What kind of rooms do you have?", "rooms"; "room kinds")]
    #[test_case("Tell me about your facilities", "facilities"; "facilities")]
    #[test_case("What activities can we do at the camp?", "activities"; "activities")]
    #[test_case("I want to see lions and elephants", "wildlife"; "lions and elephants")]
    #[test_case("Can we visit a Maasai village?", "cultural"; "maasai village")]
    #[test_case("What's the weather like in August?", "weather"; "august weather")]
    #[test_case("Do you have WiFi?", "internet"; "wifi")]
    #[test_case("Are you environmentally friendly?", "conservation"; "environmentally friendly")]
    #[test_case("We're celebrating our anniversary", "special occasions"; "anniversary")]
    #[test_case("Is the camp suitable for children?", "children"; "suitable for children")]
    #[test_case("How much does it cost to stay?", "pricing information"; "cost to stay")]
    #[test_case("I'd like to check availability for next month", "check availability"; "availability next month")]
    #[test_case("Do you offer safari packages?", "safari packages"; "safari packages")]
    #[test_case("Can you arrange airport transfers?", "airport transfer"; "airport transfers")]
    #[test_case("I need to speak with the manager", "contact manager"; "speak with manager")]
    #[test_case("What time is breakfast served?", "default"; "breakfast time")]
    #[test_case("Hello, just checking in", "default"; "plain hello")]
    fn questions_route_to_expected_keys(question: &str, expected: &str) {
        let responder = ChatResponder::new();
        assert_eq!(responder.answer_key(question), expected);
    }

    #[test]
    fn containment_beats_patterns() {
        let responder = ChatResponder::new();
        // "pricing information" appears verbatim, so the containment scan wins
        // before any pattern runs
        assert_eq!(
            responder.answer_key("Please send me your PRICING INFORMATION"),
            "pricing information"
        );
    }

    #[test]
    fn every_quick_reply_hits_its_key() {
        let responder = ChatResponder::new();
        for reply in QUICK_REPLIES {
            assert_ne!(responder.answer_key(reply), "default", "{reply}");
        }
    }

    #[test]
    fn default_response_carries_the_contact_details() {
        let responder = ChatResponder::new();
        let response = responder.response_for("zzz nothing matches here");
        assert!(response.contains("+254 741 219 994"));
        assert!(response.contains("info@talekbushcamp.com"));
    }

    fn instant_session() -> ChatSession {
        ChatSession::new(ChatConfig {
            typing_delay: Duration::ZERO,
        })
    }

    #[tokio::test]
    async fn session_opens_with_the_greeting() {
        let session = instant_session();
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].sender, Sender::Bot);
        assert_eq!(session.messages()[0].text, GREETING);
        assert!(session.show_quick_replies());
    }

    #[tokio::test]
    async fn send_appends_a_user_bot_pair() {
        let mut session = instant_session();

        let reply = session.send("Do you offer safari packages?").await;
        let reply = reply.expect("non-empty input produces a reply");
        assert_eq!(reply.sender, Sender::Bot);
        assert!(reply.text.starts_with("We offer various safari packages"));

        assert_eq!(session.messages().len(), 3);
        assert_eq!(session.messages()[1].sender, Sender::User);
        assert_eq!(session.messages()[1].text, "Do you offer safari packages?");
        assert!(!session.show_quick_replies());
    }

    #[tokio::test]
    async fn blank_input_is_ignored() {
        let mut session = instant_session();
        assert!(session.send("   ").await.is_none());
        assert_eq!(session.messages().len(), 1);
        assert!(session.show_quick_replies());
    }

    #[tokio::test]
    async fn message_ids_are_monotonic() {
        let mut session = instant_session();
        session.send("Do you have WiFi?").await;
        session.send("What about game drives?").await;

        let ids: Vec<u64> = session.messages().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }
}
