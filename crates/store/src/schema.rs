//! Record store schema.

/// Table holding one row per submission.
pub const RESPONSES_TABLE: &str = "responses";

/// Insertable columns, in bind order.
pub const INSERT_COLUMNS: [&str; 21] = [
    "name",
    "mobile",
    "area",
    "type",
    "other_type",
    "water_types",
    "other_water_type",
    "current_brand",
    "price_20l",
    "price_1l",
    "price_500ml",
    "monthly_20l",
    "daily_bottles",
    "problems",
    "switching_reasons",
    "cheaper_switch",
    "retailer_fastest_size",
    "retailer_margin",
    "retailer_credit",
    "retailer_try_hero_agro_foods",
    "comments",
];

/// Responses table DDL.
pub const CREATE_RESPONSES: &str = r#"
CREATE TABLE IF NOT EXISTS responses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT,
    mobile TEXT,
    area TEXT,
    type TEXT,
    other_type TEXT,
    water_types TEXT,
    other_water_type TEXT,
    current_brand TEXT,
    price_20l TEXT,
    price_1l TEXT,
    price_500ml TEXT,
    monthly_20l TEXT,
    daily_bottles TEXT,
    problems TEXT,
    switching_reasons TEXT,
    cheaper_switch TEXT,
    retailer_fastest_size TEXT,
    retailer_margin TEXT,
    retailer_credit TEXT,
    retailer_try_hero_agro_foods TEXT,
    comments TEXT,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP
)
"#;

/// Recency index backing the ordered listing.
pub const CREATE_CREATED_AT_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_responses_created_at ON responses (created_at DESC, id DESC)";

/// All DDL statements in execution order.
pub fn all_tables() -> Vec<&'static str> {
    vec![CREATE_RESPONSES, CREATE_CREATED_AT_INDEX]
}

/// Parameterized insert statement for [`INSERT_COLUMNS`].
pub fn insert_statement() -> String {
    let placeholders: Vec<String> = (1..=INSERT_COLUMNS.len()).map(|i| format!("?{}", i)).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        RESPONSES_TABLE,
        INSERT_COLUMNS.join(", "),
        placeholders.join(", ")
    )
}
