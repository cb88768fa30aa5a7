//! Ukrainian nutrient labels to canonical English keys.

/// Source label → canonical key. Labels ending in `:` come from the detail
/// table, the others from the summary headings.
pub const NUTRIENT_TRANSLATIONS: [(&str, &str); 8] = [
    ("Калорійність", "calories"),
    ("Жири", "fats"),
    ("Вуглеводи", "carbs"),
    ("Білки", "proteins"),
    ("НЖК:", "unsaturated fats"),
    ("Цукор:", "sugar"),
    ("Сіль:", "salt"),
    ("Порція:", "portion"),
];

/// Canonical key for `label`, or `label` itself when it is not in the table.
pub fn translate_nutrient(label: &str) -> &str {
    NUTRIENT_TRANSLATIONS
        .iter()
        .find(|(source, _)| *source == label)
        .map_or(label, |&(_, canonical)| canonical)
}
