//! Starter vocabulary for a freshly created store.

/// Concepts seeded into a new store so the first starfield is not empty.
pub const DEFAULT_VOCABULARY: &[&str] = &[
    "anteater",
    "ape",
    "armadillo",
    "baboon",
    "bat",
    "bear",
    "beetle",
    "bongo",
    "camel",
    "centipede",
    "chameleon",
    "cheetah",
    "cockatoo",
    "crane",
    "crocodile",
    "deer",
    "duck",
    "eagle",
    "elephant",
    "flamingo",
    "fox",
    "giraffe",
    "hamster",
    "hawk",
    "hermit crab",
    "hippo",
    "hippopotamus",
    "horse",
    "hummingbird",
    "hyena",
    "iguana",
    "impala",
    "jaguar",
    "kangaroo",
    "kingfisher",
    "kite",
    "kiwi",
    "koala",
    "komodo dragon",
    "leopard",
    "lion",
    "lizard",
    "mole",
    "monkey",
    "newt",
    "opossum",
    "orangutan",
    "ostrich",
    "owl",
    "panda",
    "panther",
];
