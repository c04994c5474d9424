use crate::profile::models::{CVProfile, Grant, Publication};

/// A pre-filled profile for trying matching and outreach without uploading a CV.
pub fn demo_profile() -> CVProfile {
    CVProfile {
        name: "Dr. Ada Zhang".to_string(),
        current_institution: "Tsinghua University".to_string(),
        estimated_ranking: "Top 20 globally".to_string(),
        h_index: Some("42".to_string()),
        research_focus_keywords: vec![
            "Immunology".to_string(),
            "T cell".to_string(),
            "Tumor microenvironment".to_string(),
            "Single-cell".to_string(),
        ],
        key_publications: vec![
            Publication {
                title: "Checkpoint modulation in solid tumors".to_string(),
                journal: "Nature".to_string(),
                year: Some(2023),
            },
            Publication {
                title: "Single-cell atlas of immune niches".to_string(),
                journal: "Science".to_string(),
                year: Some(2022),
            },
        ],
        grants: vec![
            Grant {
                title: "NSFC Excellent Young Scientist".to_string(),
                amount: Some("$500K".to_string()),
                year: Some(2021),
                sponsor: Some("NSFC".to_string()),
            },
            Grant {
                title: "Translational immunotherapy consortium".to_string(),
                amount: Some("$1.2M".to_string()),
                year: Some(2023),
                sponsor: Some("Industry".to_string()),
            },
        ],
        notes: "示例数据：可直接用于体验匹配与邮件生成。".to_string(),
    }
}
