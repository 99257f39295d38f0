// Copyright 2026 The itemlens authors
// Licensed under the Apache License, Version 2.0

use itemlens_table::Record;

// A small requirements-export shaped data set. The IDs deliberately include
// SRS-10 so natural ordering is visibly different from lexicographic order.
pub fn sample_records() -> Vec<Record> {
    vec![
        Record::new()
            .with("ID", "SRS-1")
            .with("Title", "Login form")
            .with("Description", "Users sign in with email and password.\nLockout after five failures.")
            .with("Labels", "auth"),
        Record::new()
            .with("ID", "SRS-2")
            .with("Title", "Password reset")
            .with("Description", "Reset link expires after 24 hours.")
            .with("Labels", "auth, email"),
        Record::new()
            .with("ID", "SRS-3")
            .with("Title", "Audit log")
            .with("Description", "Every admin action is recorded.")
            .with("Labels", ""),
        Record::new()
            .with("ID", "SRS-4")
            .with("Title", "Export to CSV")
            .with("Description", "Administrators download the full item list.")
            .with("Labels", "reporting"),
        Record::new()
            .with("ID", "SRS-10")
            .with("Title", "Session timeout")
            .with("Description", "Idle sessions end after 30 minutes.")
            .with("Labels", "auth"),
    ]
}

// Records with missing and late-appearing keys, for schema-tolerance tests.
pub fn ragged_records() -> Vec<Record> {
    vec![
        Record::new().with("ID", "SRS-1").with("Title", "first"),
        Record::new().with("ID", "SRS-2").with("Owner", "sam"),
        Record::new()
            .with("Title", "orphan")
            .with("Priority", 3_i64),
    ]
}
