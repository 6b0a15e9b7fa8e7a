pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS sheets (
    name TEXT PRIMARY KEY,
    header TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS sheet_rows (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    sheet TEXT NOT NULL REFERENCES sheets(name) ON DELETE CASCADE,
    cells TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_sheet_rows_sheet ON sheet_rows(sheet);
"#;
