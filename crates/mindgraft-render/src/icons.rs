//! Icon glyphs for topic labels.
//!
//! Two lookups live here. [`label_icon`] is the keyword table used by the JSON-tree emitter:
//! a plain substring test over the lowercased label where the last matching entry wins.
//! [`topic_icon`] is the richer lookup used by [`enhance_topic_icons`]: whole-word keywords
//! first, then substrings, then category names. Both are deterministic.

use mindgraft_core::{Topic, follow_title_renames};
use regex::Regex;
use std::sync::OnceLock;

pub const DEFAULT_ICON: &str = "📝";

/// Keyword → icon, in lookup order. Later entries win when several keywords match.
pub const LABEL_ICONS: &[(&str, &str)] = &[
    ("introduction", "📚"),
    ("summary", "📋"),
    ("conclusion", "🏁"),
    ("overview", "🔍"),
    ("analysis", "📊"),
    ("research", "🔬"),
    ("data", "📈"),
    ("results", "✅"),
    ("methods", "🔧"),
    ("process", "⚙️"),
    ("benefits", "🌟"),
    ("advantages", "👍"),
    ("disadvantages", "👎"),
    ("challenges", "🧗"),
    ("solutions", "💡"),
    ("features", "✨"),
    ("examples", "📝"),
    ("case_study", "📔"),
    ("implementation", "🛠️"),
    ("future", "🔮"),
    ("history", "📜"),
    ("development", "🚀"),
    ("comparison", "⚖️"),
    ("evaluation", "📋"),
    ("recommendation", "👉"),
    ("strategy", "♟️"),
    ("technology", "💻"),
    ("business", "💼"),
    ("education", "🎓"),
    ("health", "❤️"),
    ("environment", "🌍"),
    ("science", "🔭"),
    ("art", "🎨"),
    ("design", "✏️"),
    ("marketing", "📢"),
    ("finance", "💰"),
    ("legal", "⚖️"),
    ("social", "👥"),
    ("communication", "💬"),
    ("management", "👔"),
    ("leadership", "👑"),
    ("innovation", "💡"),
    ("creativity", "🌈"),
    ("productivity", "⏱️"),
    ("quality", "🏆"),
    ("security_topic", "🔒"),
    ("performance", "📈"),
    ("efficiency", "⚡"),
    ("sustainability", "♻️"),
    ("growth", "📈"),
    ("impact", "💥"),
    ("value", "💎"),
    ("risk", "⚠️"),
    ("opportunity", "🚪"),
    ("planning", "📅"),
    ("organization", "📂"),
    ("collaboration", "🤝"),
    ("feedback_topic", "📣"),
    ("support_service", "🤲"),
    ("training", "🏋️"),
    ("learning", "📚"),
    ("knowledge", "🧠"),
    ("skills", "🛠️"),
    ("experience_user", "🌟"),
    ("insights", "💡"),
    ("trends", "📊"),
    ("patterns", "🔄"),
    ("principles", "📜"),
    ("guidelines", "📏"),
    ("standards", "📐"),
    ("requirements", "📋"),
    ("specifications", "📝"),
    ("architecture", "🏛️"),
    ("infrastructure", "🏗️"),
    ("components", "🧩"),
    ("modules", "📦"),
    ("integration", "🔄"),
    ("testing", "🧪"),
    ("validation_process", "✅"),
    ("deployment", "🚀"),
    ("maintenance", "🔧"),
    ("monitoring", "📡"),
    ("optimization", "⚡"),
    ("scaling", "📏"),
    ("migration", "🚚"),
    ("backup", "💾"),
    ("recovery", "🔄"),
    ("privacy", "🔐"),
    ("compliance", "📜"),
    ("governance", "🏛️"),
    ("ethics", "⚖️"),
    ("responsibility", "🤲"),
    ("transparency", "🔍"),
    ("accessibility", "♿"),
    ("usability", "👆"),
    ("experience_product", "😊"),
    ("interface", "🖥️"),
    ("interaction", "🤝"),
    ("feedback_user", "💬"),
    ("support_user", "🛟"),
    ("service", "🛎️"),
    ("quality_service", "✨"),
    ("satisfaction", "😄"),
    ("loyalty", "❤️"),
    ("engagement", "🔄"),
    ("retention", "🧲"),
    ("acquisition", "🎯"),
    ("conversion", "🔄"),
    ("revenue", "💰"),
    ("profit", "💵"),
    ("cost", "💸"),
    ("investment", "📈"),
    ("return", "↩️"),
    ("budget", "💼"),
    ("forecast", "🔮"),
    ("analysis_data", "🔍"),
    ("metrics", "📊"),
    ("indicators", "📉"),
    ("measurement", "📏"),
    ("evaluation_process", "🧐"),
    ("assessment", "📋"),
    ("review", "👁️"),
    ("audit", "🔍"),
    ("inspection", "🔎"),
    ("verification", "✅"),
    ("validation_data", "👍"),
];

/// Keyword → icon for topic titles, in lookup order. The first matching entry wins.
///
/// Entries with an underscore (`writing_skill`, `research_science`) only match titles that
/// spell them out, since whole-word matching splits on `_`.
pub const TOPIC_KEYWORDS: &[(&str, &str)] = &[
    ("idea", "💡"),
    ("concept", "🧠"),
    ("theory", "🔬"),
    ("philosophy", "🧐"),
    ("thought", "💭"),
    ("insight", "✨"),
    ("create", "🛠️"),
    ("build", "🏗️"),
    ("develop", "⚙️"),
    ("implement", "🔧"),
    ("design", "🎨"),
    ("analyze", "🔍"),
    ("research", "🔍"),
    ("study", "📚"),
    ("learn", "🧩"),
    ("teach", "👨‍🏫"),
    ("share", "🤝"),
    ("technology", "💻"),
    ("computer", "🖥️"),
    ("software", "📊"),
    ("hardware", "🔌"),
    ("data", "📊"),
    ("ai", "🤖"),
    ("machine learning", "🧮"),
    ("algorithm", "📈"),
    ("code", "👨‍💻"),
    ("programming", "⌨️"),
    ("web", "🌐"),
    ("internet", "📡"),
    ("cloud", "☁️"),
    ("business", "💼"),
    ("company", "🏢"),
    ("startup", "🚀"),
    ("entrepreneur", "👔"),
    ("market", "📊"),
    ("finance", "💰"),
    ("money", "💵"),
    ("investment", "📈"),
    ("strategy", "♟️"),
    ("planning", "📝"),
    ("management", "👨‍💼"),
    ("leadership", "👑"),
    ("communication", "🗣️"),
    ("language", "🔤"),
    ("speech", "🎤"),
    ("writing_skill", "✍️"),
    ("message", "📨"),
    ("email", "📧"),
    ("chat", "💬"),
    ("discussion", "👥"),
    ("presentation", "📊"),
    ("education", "🎓"),
    ("school", "🏫"),
    ("university", "🏛️"),
    ("course", "📒"),
    ("class", "👨‍🎓"),
    ("student", "👩‍🎓"),
    ("teacher", "👨‍🏫"),
    ("learning", "📖"),
    ("knowledge", "🧠"),
    ("science", "🔬"),
    ("biology", "🧬"),
    ("chemistry", "⚗️"),
    ("physics", "⚛️"),
    ("math", "🔢"),
    ("astronomy", "🔭"),
    ("medicine", "💊"),
    ("experiment", "🧪"),
    ("research_science", "🔍"),
    ("art", "🎨"),
    ("music", "🎵"),
    ("film", "🎬"),
    ("photography", "📷"),
    ("design_art", "✏️"),
    ("literature", "📚"),
    ("writing_art", "✍️"),
    ("creativity", "🌈"),
    ("nature", "🌿"),
    ("environment", "🌍"),
    ("animal", "🐾"),
    ("plant", "🌱"),
    ("ecosystem", "🌳"),
    ("climate", "🌤️"),
    ("weather", "☀️"),
    ("ocean", "🌊"),
    ("mountain", "⛰️"),
    ("time", "⏰"),
    ("history", "📜"),
    ("future", "🔮"),
    ("past", "⏮️"),
    ("present", "⏯️"),
    ("schedule", "📅"),
    ("deadline", "⏳"),
    ("emotion", "😊"),
    ("feeling", "💓"),
    ("happiness", "😄"),
    ("sadness", "😢"),
    ("anger", "😠"),
    ("fear", "😨"),
    ("love", "❤️"),
    ("joy", "🥳"),
    ("health", "💪"),
    ("wellness", "🧘"),
    ("fitness", "🏋️"),
    ("nutrition", "🥗"),
    ("medicine_health", "💊"),
    ("mental_health", "🧠"),
    ("exercise", "🏃"),
    ("travel", "✈️"),
    ("journey", "🧳"),
    ("adventure", "🧭"),
    ("exploration", "🗺️"),
    ("destination", "📍"),
    ("tourism", "📸"),
    ("social", "👥"),
    ("community", "🏘️"),
    ("society", "🌆"),
    ("culture", "🎭"),
    ("relationship", "👫"),
    ("family", "👨‍👩‍👧‍👦"),
    ("friend", "🤝"),
    ("problem", "⚠️"),
    ("solution", "🔑"),
    ("challenge", "🏆"),
    ("opportunity", "🚪"),
    ("success", "✅"),
    ("failure", "❌"),
    ("growth", "📈"),
    ("decline", "📉"),
    ("change", "🔄"),
    ("innovation", "💫"),
    ("improvement", "📈"),
    ("quality", "✅"),
    ("quantity", "🔢"),
    ("balance", "⚖️"),
    ("diversity", "🌈"),
    ("security", "🔒"),
    ("privacy", "🕵️"),
    ("ethics", "⚖️"),
    ("law", "⚖️"),
    ("policy", "📜"),
    ("government", "🏛️"),
    ("politics", "🗳️"),
    ("democracy", "🗽"),
    ("freedom", "🕊️"),
    ("peace", "☮️"),
    ("war", "⚔️"),
    ("conflict", "🥊"),
    ("cooperation", "🤝"),
    ("competition", "🏁"),
    ("goal", "🎯"),
    ("achievement", "🏆"),
    ("reward", "🏅"),
    ("motivation", "🔥"),
    ("inspiration", "✨"),
    ("creativity_misc", "🎨"),
    ("imagination", "🌈"),
    ("dream", "💭"),
    ("reality", "🌍"),
    ("virtual", "👓"),
    ("digital", "💾"),
    ("analog", "📻"),
    ("modern", "🏙️"),
    ("traditional", "🏺"),
    ("old", "👴"),
    ("new", "🆕"),
    ("beginning", "🌅"),
    ("end", "🌇"),
    ("process", "⚙️"),
    ("system", "🔄"),
    ("structure", "🏗️"),
    ("organization", "📋"),
    ("hierarchy", "📊"),
    ("network", "🕸️"),
    ("connection", "🔗"),
    ("link", "🔗"),
    ("relationship_misc", "👫"),
    ("dependency", "⛓️"),
    ("integration", "🧩"),
    ("separation", "✂️"),
    ("division", "➗"),
    ("unity", "🤝"),
    ("collaboration", "👥"),
    ("teamwork", "🎉"),
    ("individual", "👤"),
    ("group", "👪"),
    ("community_misc", "🏘️"),
    ("global", "🌍"),
    ("local", "📍"),
    ("universal", "🌌"),
    ("specific", "🎯"),
    ("general", "🔄"),
    ("abstract", "💭"),
    ("concrete", "🧱"),
    ("physical", "💪"),
    ("mental", "🧠"),
    ("spiritual", "🧘"),
    ("emotional", "❤️"),
    ("logical", "🧮"),
    ("rational", "🤔"),
    ("intuitive", "🔮"),
    ("conscious", "👁️"),
    ("unconscious", "💤"),
    ("visible", "👁️"),
    ("invisible", "👻"),
    ("tangible", "👐"),
    ("intangible", "💨"),
    ("real", "🏞️"),
    ("imaginary", "🦄"),
    ("true", "✅"),
    ("false", "❌"),
    ("right", "✅"),
    ("wrong", "❌"),
    ("good", "👍"),
    ("bad", "👎"),
    ("positive", "➕"),
    ("negative", "➖"),
    ("neutral", "⚪"),
    ("objective", "🔭"),
    ("subjective", "🧠"),
    ("fact", "📊"),
    ("opinion", "💭"),
    ("belief", "🙏"),
    ("doubt", "🤔"),
    ("certainty", "💯"),
    ("uncertainty", "❓"),
    ("probability", "🎲"),
    ("possibility", "🚪"),
    ("opportunity_misc", "🚪"),
    ("threat", "⚠️"),
    ("strength", "💪"),
    ("weakness", "🩹"),
    ("advantage", "🥇"),
    ("disadvantage", "🥉"),
    ("benefit", "🎁"),
    ("cost", "💰"),
    ("profit", "💵"),
    ("loss", "📉"),
    ("investment_misc", "📈"),
    ("return", "🔙"),
    ("input", "⌨️"),
    ("output", "🖨️"),
    ("cause", "🔍"),
    ("effect", "💥"),
    ("reason", "🧐"),
    ("result", "🏁"),
    ("purpose", "🎯"),
    ("function", "⚙️"),
    ("role", "🎭"),
    ("responsibility", "📝"),
    ("duty", "📋"),
    ("right_misc", "✅"),
    ("privilege", "👑"),
    ("power", "⚡"),
    ("control", "🎮"),
    ("influence", "🧲"),
    ("authority", "👮"),
    ("leadership_misc", "👑"),
    ("management_misc", "👨‍💼"),
    ("supervision", "👁️"),
    ("guidance", "🧭"),
    ("direction", "🧭"),
    ("instruction", "📝"),
    ("education_misc", "🎓"),
    ("training", "🏋️"),
    ("development", "📈"),
    ("growth_misc", "🌱"),
    ("evolution", "🧬"),
    ("progress", "➡️"),
    ("advancement", "⏩"),
    ("improvement_misc", "📈"),
    ("enhancement", "✨"),
    ("optimization", "⚡"),
    ("efficiency", "⚡"),
    ("effectiveness", "🎯"),
    ("productivity", "⚙️"),
    ("performance", "📊"),
    ("quality_misc", "✅"),
    ("excellence", "🏆"),
    ("perfection", "💯"),
    ("precision", "🎯"),
    ("accuracy", "🎯"),
    ("error", "❌"),
    ("mistake", "❌"),
    ("failure_misc", "❌"),
    ("success_misc", "✅"),
    ("achievement_misc", "🏆"),
    ("accomplishment", "🏆"),
    ("completion", "🏁"),
    ("finish", "🏁"),
    ("start", "🏁"),
    ("beginning_misc", "🌅"),
    ("end_misc", "🌇"),
    ("middle", "⏸️"),
    ("center", "🎯"),
    ("core", "🎯"),
    ("foundation", "🏗️"),
    ("base", "🏗️"),
    ("support", "🤝"),
    ("structure_misc", "🏗️"),
    ("framework", "🏗️"),
    ("architecture", "🏛️"),
];

/// Category name → representative icon, consulted when no keyword matches.
pub const TOPIC_CATEGORIES: &[(&str, &str)] = &[
    ("technology", "💻"),
    ("programming", "👨‍💻"),
    ("ai", "🤖"),
    ("data", "📊"),
    ("business", "💼"),
    ("finance", "💰"),
    ("marketing", "📣"),
    ("education", "🎓"),
    ("learning", "📚"),
    ("science", "🔬"),
    ("research", "🔍"),
    ("health", "❤️"),
    ("medicine", "💊"),
    ("art", "🎨"),
    ("music", "🎵"),
    ("design", "🎨"),
    ("nature", "🌿"),
    ("environment", "🌍"),
    ("communication", "🗣️"),
    ("social", "👥"),
    ("time", "⏰"),
    ("planning", "📅"),
    ("emotions", "😊"),
    ("psychology", "🧠"),
    ("travel", "✈️"),
    ("places", "🏠"),
    ("food", "🍎"),
    ("drink", "🍵"),
    ("sports", "⚽"),
    ("fitness", "🏋️"),
    ("idea", "💡"),
    ("success", "🏆"),
    ("challenge", "🏆"),
    ("growth", "📈"),
    ("innovation", "💡"),
    ("quality", "✅"),
    ("efficiency", "⚡"),
    ("security", "🔒"),
    ("analysis", "🔍"),
    ("strategy", "♟️"),
    ("leadership", "👑"),
    ("collaboration", "🤝"),
    ("problem", "⚠️"),
    ("solution", "💡"),
];

fn leading_icon_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^\s*(\p{Extended_Pictographic}[\x{FE0E}\x{FE0F}]?\p{Emoji_Modifier}?(?:\x{200D}\p{Extended_Pictographic}[\x{FE0E}\x{FE0F}]?\p{Emoji_Modifier}?)*)\s*",
        )
        .expect("valid regex")
    })
}

/// `true` when the first non-space character is a pictographic code point.
pub fn has_leading_icon(label: &str) -> bool {
    leading_icon_re().is_match(label)
}

/// Splits `"💡 Ideas"` into `(Some("💡"), "Ideas")`. Variation selectors and ZWJ sequences stay
/// attached to the icon.
pub fn split_leading_icon(label: &str) -> (Option<&str>, &str) {
    match leading_icon_re().captures(label) {
        Some(caps) => {
            let (Some(icon), Some(whole)) = (caps.get(1), caps.get(0)) else {
                return (None, label);
            };
            (Some(icon.as_str()), &label[whole.end()..])
        }
        None => (None, label),
    }
}

pub fn label_icon(label: &str) -> &'static str {
    let lower = label.to_lowercase();
    LABEL_ICONS
        .iter()
        .rev()
        .find(|(keyword, _)| lower.contains(keyword))
        .map_or(DEFAULT_ICON, |(_, icon)| icon)
}

/// Prefixes the label with [`label_icon`] unless it already starts with an icon.
pub fn ensure_label_icon(label: &str) -> String {
    if has_leading_icon(label) {
        label.to_string()
    } else {
        format!("{} {}", label_icon(label), label)
    }
}

fn words(text: &str) -> String {
    let joined = text
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    format!(" {joined} ")
}

/// Icon for a topic title. Tried in order:
///
/// 1. a keyword equal to the title or standing as a whole word in it,
/// 2. a keyword anywhere in the title,
/// 3. a category name anywhere in the title,
/// 4. a title word of three or more characters that contains, or is part of, a category name.
pub fn topic_icon(title: &str) -> Option<&'static str> {
    let lower = title.to_lowercase();
    let bounded = words(title);

    let by_word = TOPIC_KEYWORDS
        .iter()
        .find(|(kw, _)| lower == *kw || bounded.contains(&format!(" {kw} ")));
    let by_substring = || TOPIC_KEYWORDS.iter().find(|(kw, _)| lower.contains(*kw));
    let by_category = || TOPIC_CATEGORIES.iter().find(|(name, _)| lower.contains(*name));

    by_word
        .or_else(by_substring)
        .or_else(by_category)
        .map(|(_, icon)| *icon)
        .or_else(|| partial_category_icon(&lower))
}

fn partial_category_icon(lower: &str) -> Option<&'static str> {
    lower
        .split_whitespace()
        .filter(|word| word.chars().count() >= 3)
        .find_map(|word| {
            TOPIC_CATEGORIES
                .iter()
                .find(|(name, _)| name.contains(word) || word.contains(*name))
                .map(|(_, icon)| *icon)
        })
}

/// Returns a copy of the forest where every topic without an icon gets one from [`topic_icon`].
///
/// The icon is also prefixed to the title unless the title already contains it. Topics with an
/// icon, or with no match, are copied unchanged apart from their subtopics.
///
/// Relationship targets follow the rewritten titles so cross references still resolve.
pub fn enhance_topic_icons(topics: &[Topic]) -> Vec<Topic> {
    let mut out: Vec<Topic> = topics.iter().map(enhance_topic).collect();
    follow_title_renames(topics, &mut out);
    out
}

fn enhance_topic(topic: &Topic) -> Topic {
    let mut out = Topic {
        subtopics: topic.subtopics.iter().map(enhance_topic).collect(),
        ..topic.clone()
    };
    let has_icon = topic.icon.as_deref().is_some_and(|i| !i.is_empty());
    if has_icon || has_leading_icon(&topic.title) {
        return out;
    }
    if let Some(icon) = topic_icon(&topic.title) {
        out.icon = Some(icon.to_string());
        if !out.title.contains(icon) {
            out.title = format!("{icon} {}", out.title);
        }
    }
    out
}
