//! Built-in address noise tokens.
//!
//! Entries are stored in normalized form. Russian abbreviations appear both
//! transliterated and in Cyrillic so removal works whether or not
//! transliteration is enabled.

pub const DEFAULT_STOP_TOKENS: &[&str] = &[
    // street / avenue / lane
    "ul", "ulitsa", "pr", "prosp", "prospekt", "per", "pereulok",
    "ул", "улица", "пр", "просп", "проспект", "пер", "переулок",
    "street", "st", "avenue", "ave", "road", "rd", "lane", "ln",
    // building / block
    "d", "dom", "k", "korp", "korpus", "str", "stroenie",
    "д", "дом", "к", "корп", "корпус", "стр", "строение",
    "building", "bldg", "bld", "block", "blk",
    // entrance / apartment
    "pod", "podezd", "kv",
    "под", "подъезд", "кв",
    "entrance", "ent", "apt", "apartment",
];
