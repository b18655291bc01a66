//! Built-in valence lexicon tuned for car dealership reviews.
//!
//! Valences sit on the usual `[-4, 4]` scale of rule-based sentiment lexicons.

pub(super) const VALENCES: &[(&str, f64)] = &[
    // positive
    ("amazing", 2.8),
    ("awesome", 3.1),
    ("best", 3.2),
    ("better", 1.9),
    ("clean", 1.7),
    ("comfortable", 1.5),
    ("courteous", 2.3),
    ("delighted", 2.9),
    ("easy", 1.9),
    ("efficient", 1.8),
    ("enjoy", 2.2),
    ("enjoyed", 2.3),
    ("excellent", 2.7),
    ("fair", 1.3),
    ("fantastic", 2.6),
    ("fast", 1.3),
    ("fine", 0.8),
    ("friendly", 2.2),
    ("glad", 2.0),
    ("good", 1.9),
    ("great", 3.1),
    ("happy", 2.7),
    ("helpful", 1.7),
    ("honest", 2.3),
    ("impressed", 2.1),
    ("knowledgeable", 1.6),
    ("like", 2.0),
    ("liked", 1.8),
    ("love", 3.2),
    ("loved", 2.9),
    ("nice", 1.8),
    ("ok", 0.9),
    ("okay", 0.9),
    ("outstanding", 3.0),
    ("patient", 1.6),
    ("perfect", 2.7),
    ("pleasant", 2.3),
    ("pleased", 1.9),
    ("polite", 1.8),
    ("professional", 1.7),
    ("quick", 1.2),
    ("recommend", 1.5),
    ("recommended", 1.6),
    ("reliable", 1.9),
    ("satisfied", 1.8),
    ("smooth", 1.5),
    ("superb", 3.1),
    ("thank", 1.5),
    ("thanks", 1.9),
    ("trust", 2.3),
    ("trustworthy", 2.6),
    ("wonderful", 2.7),
    ("worth", 0.9),
    // negative
    ("angry", -2.3),
    ("annoyed", -1.6),
    ("annoying", -1.7),
    ("avoid", -1.2),
    ("awful", -2.0),
    ("bad", -2.5),
    ("broke", -1.8),
    ("broken", -1.4),
    ("careless", -1.5),
    ("cheated", -2.3),
    ("complaint", -1.5),
    ("confused", -1.3),
    ("delay", -1.3),
    ("dirty", -1.9),
    ("disappointed", -1.9),
    ("disappointing", -2.2),
    ("dishonest", -2.7),
    ("dislike", -1.6),
    ("expensive", -0.9),
    ("frustrated", -2.0),
    ("frustrating", -1.9),
    ("hate", -2.7),
    ("hated", -3.2),
    ("horrible", -2.5),
    ("ignored", -1.6),
    ("lied", -2.4),
    ("mess", -1.5),
    ("overpriced", -1.8),
    ("pathetic", -2.7),
    ("poor", -2.1),
    ("problem", -1.7),
    ("problems", -1.7),
    ("pushy", -1.6),
    ("regret", -1.8),
    ("rude", -2.0),
    ("sad", -2.1),
    ("scam", -2.6),
    ("slow", -1.0),
    ("sucks", -1.5),
    ("terrible", -2.1),
    ("unhappy", -1.8),
    ("unprofessional", -2.0),
    ("useless", -1.8),
    ("waste", -1.8),
    ("wasted", -2.2),
    ("worse", -2.1),
    ("worst", -3.1),
    ("wrong", -2.1),
];

/// Intensity modifiers. Positive entries boost, negative ones dampen.
pub(super) const BOOSTERS: &[(&str, f64)] = &[
    ("absolutely", 0.293),
    ("completely", 0.293),
    ("especially", 0.293),
    ("exceptionally", 0.293),
    ("extremely", 0.293),
    ("highly", 0.293),
    ("incredibly", 0.293),
    ("really", 0.293),
    ("so", 0.293),
    ("super", 0.293),
    ("totally", 0.293),
    ("truly", 0.293),
    ("very", 0.293),
    ("barely", -0.293),
    ("hardly", -0.293),
    ("marginally", -0.293),
    ("slightly", -0.293),
    ("somewhat", -0.293),
];

pub(super) const NEGATIONS: &[&str] = &[
    "aint", "ain't", "arent", "aren't", "cannot", "cant", "can't", "couldnt", "couldn't", "didnt",
    "didn't", "doesnt", "doesn't", "dont", "don't", "hadnt", "hadn't", "hasnt", "hasn't",
    "havent", "haven't", "isnt", "isn't", "neither", "never", "no", "nobody", "none", "nope",
    "nor", "not", "nothing", "nowhere", "shouldnt", "shouldn't", "wasnt", "wasn't", "werent",
    "weren't", "without", "wont", "won't", "wouldnt", "wouldn't",
];
