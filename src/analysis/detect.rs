//! Keyword heuristics over dependency names and repository paths.

use super::structure::FileEntry;

/// Dependency-name keyword → framework label, checked in this order
pub const FRAMEWORK_KEYWORDS: &[(&str, &str)] = &[
    ("react", "React"),
    ("next", "Next.js"),
    ("vue", "Vue.js"),
    ("nuxt", "Nuxt.js"),
    ("angular", "Angular"),
    ("express", "Express.js"),
    ("fastapi", "FastAPI"),
    ("django", "Django"),
    ("flask", "Flask"),
    ("spring", "Spring"),
    ("rails", "Ruby on Rails"),
    ("laravel", "Laravel"),
    ("tailwindcss", "Tailwind CSS"),
    ("bootstrap", "Bootstrap"),
    ("prisma", "Prisma"),
    ("mongoose", "Mongoose"),
    ("sequelize", "Sequelize"),
    ("axum", "Axum"),
    ("actix-web", "Actix Web"),
    ("rocket", "Rocket"),
    ("tokio", "Tokio"),
];

/// File name → framework label
const FRAMEWORK_FILES: &[(&str, &str)] = &[
    ("next.config.js", "Next.js"),
    ("next.config.ts", "Next.js"),
    ("vite.config.js", "Vite"),
    ("vite.config.ts", "Vite"),
    ("angular.json", "Angular"),
];

const DATABASE_PACKAGES: &[&str] = &["prisma", "mongoose", "sequelize", "typeorm"];
const AUTH_PACKAGES: &[&str] = &["nextauth", "passport", "auth0"];

fn push_unique(labels: &mut Vec<String>, label: &str) {
    if !labels.iter().any(|l| l == label) {
        labels.push(label.to_string());
    }
}

/// Frameworks implied by dependency names (substring match) and marker files
pub fn detect_frameworks(structure: &[FileEntry], dependencies: &[String]) -> Vec<String> {
    let mut frameworks = Vec::new();

    for dep in dependencies {
        let dep = dep.to_lowercase();
        for (keyword, label) in FRAMEWORK_KEYWORDS {
            if dep.contains(keyword) {
                push_unique(&mut frameworks, label);
            }
        }
    }

    for (file, label) in FRAMEWORK_FILES {
        if structure.iter().any(|entry| entry.name == *file) {
            push_unique(&mut frameworks, label);
        }
    }

    frameworks
}

/// Notable capabilities, in a fixed order
pub fn detect_features(structure: &[FileEntry], dependencies: &[String]) -> Vec<String> {
    let mut features = Vec::new();
    let has_dependency = |names: &[&str]| {
        dependencies
            .iter()
            .any(|dep| names.contains(&dep.to_lowercase().as_str()))
    };

    if structure
        .iter()
        .any(|e| e.path.contains("api/") || e.path.contains("routes/"))
    {
        features.push("REST API");
    }
    if has_dependency(DATABASE_PACKAGES) {
        features.push("Database Integration");
    }
    if has_dependency(AUTH_PACKAGES) {
        features.push("Authentication");
    }
    if has_tests(structure) {
        features.push("Automated Testing");
    }
    if structure
        .iter()
        .any(|e| e.name.ends_with(".ts") || e.name.ends_with(".tsx"))
    {
        features.push("TypeScript Support");
    }
    if structure
        .iter()
        .any(|e| e.name == "Dockerfile" || e.name == "docker-compose.yml")
    {
        features.push("Docker Support");
    }
    if structure.iter().any(|e| e.path.contains(".github/workflows/")) {
        features.push("CI/CD Pipeline");
    }

    features.into_iter().map(String::from).collect()
}

pub fn has_tests(structure: &[FileEntry]) -> bool {
    structure.iter().any(|e| {
        e.path.contains("test/")
            || e.path.contains("tests/")
            || e.path.contains("__tests__/")
            || e.name.contains(".test.")
            || e.name.contains(".spec.")
    })
}

pub fn has_documentation(structure: &[FileEntry]) -> bool {
    structure.iter().any(|e| {
        e.name.eq_ignore_ascii_case("readme.md")
            || e.path.contains("docs/")
            || e.path.contains("documentation/")
    })
}
