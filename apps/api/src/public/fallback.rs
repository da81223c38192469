//! Sample content shown in place of a section that has no live data.

use crate::models::{About, Certification, Education, Experience, Project};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn about() -> About {
    About {
        id: Some("sample-about".into()),
        name: "Alex Morgan".into(),
        title: "Software Engineer".into(),
        bio: "I build reliable web services and the tools around them. \
              I enjoy turning fuzzy requirements into small, well-tested systems."
            .into(),
        skills: strings(&["Rust", "TypeScript", "PostgreSQL", "Docker", "AWS"]),
        photo_url: None,
        ..About::default()
    }
}

pub fn education() -> Vec<Education> {
    vec![
        Education {
            id: Some("sample-education-1".into()),
            degree: "Master of Science in Computer Science".into(),
            institution: "State University".into(),
            location: Some("Springfield".into()),
            start_date: "2019".into(),
            end_date: "2021".into(),
            description: Some("Focus on distributed systems and databases.".into()),
            logo_url: None,
        },
        Education {
            id: Some("sample-education-2".into()),
            degree: "Bachelor of Science in Software Engineering".into(),
            institution: "City College".into(),
            location: Some("Riverton".into()),
            start_date: "2015".into(),
            end_date: "2019".into(),
            description: None,
            logo_url: None,
        },
    ]
}

pub fn experience() -> Vec<Experience> {
    vec![
        Experience {
            id: Some("sample-experience-1".into()),
            title: "Backend Engineer".into(),
            company: "Example Corp".into(),
            location: "Remote".into(),
            start_date: "2021".into(),
            end_date: "Present".into(),
            description: None,
            responsibilities: strings(&[
                "Designed and maintained HTTP APIs",
                "Ran the PostgreSQL schema and migrations",
                "Set up CI pipelines and container builds",
            ]),
            logo_url: None,
        },
        Experience {
            id: Some("sample-experience-2".into()),
            title: "Software Engineering Intern".into(),
            company: "Startup Labs".into(),
            location: "Springfield".into(),
            start_date: "2020".into(),
            end_date: "2020".into(),
            description: None,
            responsibilities: strings(&["Built internal dashboards", "Wrote integration tests"]),
            logo_url: None,
        },
    ]
}

pub fn certifications() -> Vec<Certification> {
    vec![Certification {
        id: Some("sample-certification-1".into()),
        title: "Cloud Practitioner".into(),
        issuer: "Cloud Provider".into(),
        issue_date: "2022".into(),
        expiry_date: Some("2025".into()),
        credential_id: None,
        credential_url: None,
        skills: strings(&["Cloud", "Networking"]),
        logo_url: None,
    }]
}

pub fn projects() -> Vec<Project> {
    vec![
        Project {
            id: Some("sample-project-1".into()),
            title: "Task Tracker".into(),
            description: "A small task tracker with a REST API and a web front end.".into(),
            technologies: strings(&["Rust", "axum", "PostgreSQL"]),
            image_url: None,
            github_url: Some("https://github.com/example/task-tracker".into()),
            live_url: None,
            featured: true,
        },
        Project {
            id: Some("sample-project-2".into()),
            title: "Link Shortener".into(),
            description: "URL shortener with click statistics.".into(),
            technologies: strings(&["TypeScript", "Redis"]),
            image_url: None,
            github_url: Some("https://github.com/example/link-shortener".into()),
            live_url: None,
            featured: false,
        },
    ]
}
