// Built-in country table
// Load-time constant; canonical display name paired with the report abbreviation.

/// The directory shipped with the application. Order matters: the containment
/// fallback in the resolver scans entries in this order and returns the first hit.
pub(super) const BUILTIN: &[(&str, &str)] = &[
    ("Афганистан", "Афг"),
    ("Алжир", "Алж"),
    ("Бахрейн", "Бах"),
    ("Джибути", "Джи"),
    ("Египет", "Еги"),
    ("Иордания", "Иор"),
    ("Ирак", "Ирак"),
    ("Иран", "Иран"),
    ("Йемен", "Йем"),
    ("Катар", "Кат"),
    ("Кувейт", "Кув"),
    ("Ливан", "Ливан"),
    ("Ливия", "Ливия"),
    ("Мавритания", "Мав"),
    ("Марокко", "Мар"),
    ("Монголия", "Мон"),
    ("ОАЭ", "ОАЭ"),
    ("Оман", "Ома"),
    ("Палестина", "Пал"),
    ("Саудовская Аравия", "Сау"),
    ("Сирия", "Сир"),
    ("Судан", "Суд"),
    ("Сомали", "Сом"),
    ("Тунис", "Тун"),
    ("Эфиопия", "Эфи"),
    ("Южный Судан", "Южн"),
];
