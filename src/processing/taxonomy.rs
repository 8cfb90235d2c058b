//! Skill taxonomy and substring-based skill extraction

use crate::error::{Result, ResumatchError};
use aho_corasick::AhoCorasick;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::OnceLock;

/// A named group of canonical skill strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SkillCategory {
    #[serde(deserialize_with = "crate::llm::types::null_as_default")]
    pub category: String,
    #[serde(deserialize_with = "crate::llm::types::null_as_default")]
    pub skills: Vec<String>,
}

impl SkillCategory {
    pub fn new(category: impl Into<String>, skills: &[&str]) -> Self {
        Self {
            category: category.into(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// On-disk shape of a custom taxonomy file
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TaxonomyFile {
    categories: Vec<SkillCategory>,
}

/// A flattened skill in taxonomy order
#[derive(Debug, Clone)]
struct Candidate {
    skill: String,
    category: usize,
    pattern: usize,
}

/// Fixed, ordered mapping from category to canonical skills.
///
/// Matching is a case-insensitive substring test against the raw text rather
/// than the token stream, so multi-word skills such as "Machine Learning" are
/// found. Skills that are substrings of longer words ("Java" inside
/// "JavaScript") match as well.
pub struct SkillTaxonomy {
    categories: Vec<SkillCategory>,
    candidates: Vec<Candidate>,
    matcher: AhoCorasick,
    pattern_count: usize,
}

impl std::fmt::Debug for SkillTaxonomy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkillTaxonomy")
            .field("categories", &self.categories.len())
            .field("skills", &self.candidates.len())
            .finish()
    }
}

impl SkillTaxonomy {
    pub fn new(categories: Vec<SkillCategory>) -> Result<Self> {
        if categories.iter().all(|c| c.skills.is_empty()) {
            return Err(ResumatchError::Configuration(
                "Skill taxonomy contains no skills".to_string(),
            ));
        }

        // One automaton pattern per distinct lowercased skill; several
        // candidates may share a pattern ("AWS" listed twice, "aws" vs "AWS").
        let mut pattern_ids: HashMap<String, usize> = HashMap::new();
        let mut patterns: Vec<String> = Vec::new();
        let mut candidates = Vec::new();

        for (category_idx, category) in categories.iter().enumerate() {
            for skill in &category.skills {
                if skill.trim().is_empty() {
                    return Err(ResumatchError::Configuration(format!(
                        "Empty skill in taxonomy category '{}'",
                        category.category
                    )));
                }

                let lowered = skill.to_lowercase();
                let pattern = *pattern_ids.entry(lowered.clone()).or_insert_with(|| {
                    patterns.push(lowered);
                    patterns.len() - 1
                });

                candidates.push(Candidate {
                    skill: skill.clone(),
                    category: category_idx,
                    pattern,
                });
            }
        }

        let matcher = AhoCorasick::builder()
            .build(&patterns)
            .map_err(|e| {
                ResumatchError::Configuration(format!("Failed to build skill matcher: {}", e))
            })?;

        Ok(Self {
            categories,
            candidates,
            matcher,
            pattern_count: patterns.len(),
        })
    }

    /// Built-in taxonomy, constructed once and shared
    pub fn default_taxonomy() -> &'static SkillTaxonomy {
        static DEFAULT: OnceLock<SkillTaxonomy> = OnceLock::new();
        DEFAULT.get_or_init(|| {
            SkillTaxonomy::new(default_categories()).expect("built-in taxonomy is valid")
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: TaxonomyFile = toml::from_str(content).map_err(|e| {
            ResumatchError::Configuration(format!("Failed to parse taxonomy: {}", e))
        })?;
        Self::new(file.categories)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn categories(&self) -> &[SkillCategory] {
        &self.categories
    }

    pub fn skill_count(&self) -> usize {
        self.candidates.len()
    }

    /// Skills found anywhere in `text`, in taxonomy order, without duplicates
    pub fn extract_skills(&self, text: &str) -> Vec<String> {
        let hits = self.pattern_hits(text);

        let mut seen = HashSet::new();
        self.candidates
            .iter()
            .filter(|c| hits[c.pattern])
            .filter(|c| seen.insert(c.skill.as_str()))
            .map(|c| c.skill.clone())
            .collect()
    }

    /// Résumé skills that also appear verbatim in the job description.
    ///
    /// Extraction from the résumé ignores case but the job-description test
    /// is case-sensitive: "python" in a posting does not confirm "Python".
    pub fn matched_skills(&self, resume_text: &str, job_text: &str) -> Vec<String> {
        self.extract_skills(resume_text)
            .into_iter()
            .filter(|skill| job_text.contains(skill.as_str()))
            .collect()
    }

    /// Extracted skills grouped by category; empty categories are omitted
    pub fn group_skills(&self, text: &str) -> Vec<SkillCategory> {
        let hits = self.pattern_hits(text);

        let mut groups: Vec<SkillCategory> = self
            .categories
            .iter()
            .map(|c| SkillCategory {
                category: c.category.clone(),
                skills: Vec::new(),
            })
            .collect();

        for candidate in self.candidates.iter().filter(|c| hits[c.pattern]) {
            let group = &mut groups[candidate.category];
            if !group.skills.contains(&candidate.skill) {
                group.skills.push(candidate.skill.clone());
            }
        }

        groups.retain(|g| !g.skills.is_empty());
        groups
    }

    // Patterns are lowercased at construction, so folding the text is enough
    fn pattern_hits(&self, text: &str) -> Vec<bool> {
        let mut hits = vec![false; self.pattern_count];
        let lowered = text.to_lowercase();
        for mat in self.matcher.find_overlapping_iter(&lowered) {
            hits[mat.pattern().as_usize()] = true;
        }
        hits
    }
}

/// The built-in categories used when no custom taxonomy is configured
pub fn default_categories() -> Vec<SkillCategory> {
    vec![
        SkillCategory::new(
            "Programming",
            &[
                "Python", "JavaScript", "TypeScript", "Java", "Go", "Rust", "C++", "C#",
                "Ruby", "PHP", "Swift", "Kotlin", "Scala", "SQL", "Bash",
            ],
        ),
        SkillCategory::new(
            "Frameworks",
            &[
                "React", "Angular", "Vue", "Next.js", "Node.js", "Express", "Django",
                "Flask", "FastAPI", "Spring", "Rails", ".NET", "Tailwind",
            ],
        ),
        SkillCategory::new(
            "Databases",
            &[
                "PostgreSQL", "MySQL", "MongoDB", "Redis", "SQLite", "DynamoDB",
                "Cassandra", "Elasticsearch", "Oracle",
            ],
        ),
        SkillCategory::new(
            "Tools",
            &[
                "AWS", "Azure", "GCP", "Docker", "Kubernetes", "Terraform", "Git",
                "Jenkins", "Linux", "Kafka", "GraphQL", "CI/CD", "Jira",
            ],
        ),
        SkillCategory::new(
            "AI/ML",
            &[
                "Machine Learning", "Deep Learning", "TensorFlow", "PyTorch",
                "scikit-learn", "Pandas", "NumPy", "NLP", "Computer Vision", "LLM",
            ],
        ),
    ]
}
