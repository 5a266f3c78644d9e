//! SQLite schema definition.

/// Complete database schema for PawRx.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Pets
-- ============================================================================

CREATE TABLE IF NOT EXISTS pets (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL,
    name TEXT NOT NULL,
    species TEXT NOT NULL,
    breed TEXT,
    weight REAL NOT NULL DEFAULT 0,
    weight_unit TEXT NOT NULL DEFAULT 'kg',
    age REAL NOT NULL DEFAULT 0,
    age_unit TEXT NOT NULL DEFAULT 'years',
    sex TEXT NOT NULL DEFAULT 'unknown',
    neutered INTEGER NOT NULL DEFAULT 0,
    allergies TEXT NOT NULL DEFAULT '[]',           -- JSON array of strings
    chronic_conditions TEXT NOT NULL DEFAULT '[]',  -- JSON array of strings
    microchip_id TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_pets_owner ON pets(owner_id);

-- ============================================================================
-- Medications
-- ============================================================================

CREATE TABLE IF NOT EXISTS pet_medications (
    id TEXT PRIMARY KEY,
    pet_id TEXT NOT NULL REFERENCES pets(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    brand_name TEXT,
    dosage TEXT,
    frequency TEXT,
    route TEXT NOT NULL DEFAULT 'oral',
    start_date TEXT NOT NULL,
    end_date TEXT,
    prescribed_by TEXT,
    reason TEXT,
    instructions TEXT,
    status TEXT NOT NULL DEFAULT 'active',          -- active, completed, discontinued
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_medications_pet_status ON pet_medications(pet_id, status);

-- ============================================================================
-- Adverse Reactions
-- ============================================================================

CREATE TABLE IF NOT EXISTS adverse_reactions (
    id TEXT PRIMARY KEY,
    pet_id TEXT NOT NULL REFERENCES pets(id) ON DELETE CASCADE,
    medication TEXT NOT NULL,
    date TEXT NOT NULL,
    severity TEXT NOT NULL,
    symptoms TEXT NOT NULL DEFAULT '[]',            -- JSON array of strings
    duration TEXT,
    treatment TEXT,
    outcome TEXT NOT NULL DEFAULT 'recovered',
    reported_by TEXT,
    notes TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_reactions_pet_date ON adverse_reactions(pet_id, date);

-- ============================================================================
-- Appointments
-- ============================================================================

CREATE TABLE IF NOT EXISTS appointments (
    id TEXT PRIMARY KEY,
    pet_id TEXT NOT NULL REFERENCES pets(id) ON DELETE CASCADE,
    kind TEXT NOT NULL,
    title TEXT,
    date TEXT NOT NULL,
    time TEXT,
    veterinarian TEXT,
    clinic TEXT,
    notes TEXT,
    status TEXT NOT NULL DEFAULT 'scheduled',
    reminder_days_before INTEGER,                   -- NULL disables the reminder
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_appointments_pet_date ON appointments(pet_id, date);

-- ============================================================================
-- Interaction Check History
-- ============================================================================

CREATE TABLE IF NOT EXISTS interaction_checks (
    id TEXT PRIMARY KEY,
    pet_id TEXT NOT NULL REFERENCES pets(id) ON DELETE CASCADE,
    checked_by TEXT NOT NULL,
    overall_risk_level TEXT NOT NULL,
    result TEXT NOT NULL,                           -- JSON InteractionCheckResult
    fingerprint TEXT NOT NULL,                      -- SHA-256 of result JSON
    checked_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_checks_pet ON interaction_checks(pet_id, checked_at);
"#;
