//! The `evap-results init` command.

use std::path::Path;

use anyhow::Result;

use evap_results_core::snapshot::Snapshot;

pub fn execute() -> Result<()> {
    if Path::new("evap-results.toml").exists() {
        println!("evap-results.toml already exists, skipping.");
    } else {
        std::fs::write("evap-results.toml", SAMPLE_CONFIG)?;
        println!("Created evap-results.toml");
    }

    let snapshot_path = Path::new("snapshot.json");
    if snapshot_path.exists() {
        println!("snapshot.json already exists, skipping.");
    } else {
        let snapshot: Snapshot = serde_json::from_str(SAMPLE_SNAPSHOT)?;
        snapshot.save_json(snapshot_path)?;
        println!("Created snapshot.json");
    }

    println!("\nNext steps:");
    println!("  1. Replace snapshot.json with an export of your data");
    println!("  2. Run: evap-results index");
    println!("  3. Run: evap-results semester --semester 1 --viewer 2");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# evap-results configuration

language = "en"
min_voter_count = 2
min_voter_percentage = 0.2
output_dir = "./evap-results-export"
"#;

const SAMPLE_SNAPSHOT: &str = r#"{
  "degrees": [{ "id": 1, "name": "Computer Science", "order": 0 }],
  "semesters": [{ "id": 1, "name": "SS 24" }],
  "courses": [
    {
      "id": 1,
      "semester": 1,
      "name": "Introduction to Programming",
      "type": "Lecture",
      "degrees": [1],
      "state": "published",
      "num_voters": 4,
      "num_participants": 10,
      "num_text_answers": 1,
      "contributions": [
        { "id": 1, "contributor": null },
        { "id": 2, "contributor": 1, "responsible": true, "comment_visibility": "all_comments" }
      ]
    }
  ],
  "results": [
    {
      "course": 1,
      "distribution": [0.25, 0.5, 0.25, 0.0, 0.0],
      "sections": [
        {
          "questionnaire": { "id": 1, "name": "General" },
          "results": [
            {
              "kind": "rating",
              "question": { "id": 1, "text": "The course was well structured", "kind": "rating" },
              "total_count": 4,
              "average": 2.0,
              "counts": [1, 2, 1, 0, 0]
            },
            {
              "kind": "text",
              "question": { "id": 2, "text": "What did you like?", "kind": "text" },
              "answers": [
                { "id": 1, "contribution": 1, "text": "The exercises", "state": "published" }
              ]
            }
          ]
        }
      ]
    }
  ]
}
"#;
