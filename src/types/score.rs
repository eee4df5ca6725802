use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyzerKind {
    Structure,
    CodeQuality,
    Documentation,
    VersionControl,
    Testing,
    TechStack,
    RealWorld,
    Security,
    Complexity,
}

impl AnalyzerKind {
    /// Fixed narration order.
    pub const ALL: [AnalyzerKind; 9] = [
        AnalyzerKind::Structure,
        AnalyzerKind::CodeQuality,
        AnalyzerKind::Documentation,
        AnalyzerKind::VersionControl,
        AnalyzerKind::Testing,
        AnalyzerKind::TechStack,
        AnalyzerKind::RealWorld,
        AnalyzerKind::Security,
        AnalyzerKind::Complexity,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::Structure => "structure",
            Self::CodeQuality => "code_quality",
            Self::Documentation => "documentation",
            Self::VersionControl => "version_control",
            Self::Testing => "testing",
            Self::TechStack => "tech_stack",
            Self::RealWorld => "real_world",
            Self::Security => "security",
            Self::Complexity => "complexity",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Structure => "project structure",
            Self::CodeQuality => "code quality",
            Self::Documentation => "documentation",
            Self::VersionControl => "version control",
            Self::Testing => "testing",
            Self::TechStack => "tech stack",
            Self::RealWorld => "real-world applicability",
            Self::Security => "security",
            Self::Complexity => "code complexity",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub id: String,
    pub message: String,
}

impl Issue {
    pub fn new(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialScore {
    pub score: u32,
    pub max_score: u32,
    pub issues: Vec<Issue>,
}

impl PartialScore {
    pub fn new(score: u32, max_score: u32, issues: Vec<Issue>) -> Self {
        Self {
            score: score.min(max_score),
            max_score,
            issues,
        }
    }

    /// Stand-in for an analyzer that panicked or never reported.
    pub fn degraded(kind: AnalyzerKind, max_score: u32, reason: &str) -> Self {
        Self::new(
            0,
            max_score,
            vec![Issue::new(
                format!("{}.failed", kind.id()),
                format!("{} analysis could not complete: {reason}", kind.title()),
            )],
        )
    }

    pub fn ratio(&self) -> f64 {
        if self.max_score == 0 {
            return 0.0;
        }
        f64::from(self.score) / f64::from(self.max_score)
    }

    pub fn has_issue(&self, id: &str) -> bool {
        self.issues.iter().any(|issue| issue.id == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    CodeQuality,
    ProjectStructure,
    Documentation,
    Testing,
    GitPractices,
    RealWorldRelevance,
    Security,
    CodeComplexity,
}

impl Category {
    /// Display order of the `scores` map.
    pub const ALL: [Category; 8] = [
        Category::CodeQuality,
        Category::ProjectStructure,
        Category::Documentation,
        Category::Testing,
        Category::GitPractices,
        Category::RealWorldRelevance,
        Category::Security,
        Category::CodeComplexity,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::CodeQuality => "Code Quality",
            Self::ProjectStructure => "Project Structure",
            Self::Documentation => "Documentation",
            Self::Testing => "Testing",
            Self::GitPractices => "Git Practices",
            Self::RealWorldRelevance => "Real-World Relevance",
            Self::Security => "Security",
            Self::CodeComplexity => "Code Complexity",
        }
    }
}

/// Which analyzer feeds each display category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CategoryBinding {
    /// Reproduces the shared bindings of the published rubric.
    #[default]
    Legacy,
    Distinct,
}

impl CategoryBinding {
    pub fn analyzer_for(self, category: Category) -> AnalyzerKind {
        match (self, category) {
            (_, Category::RealWorldRelevance) => AnalyzerKind::RealWorld,
            (_, Category::CodeQuality) => AnalyzerKind::CodeQuality,
            (Self::Legacy, Category::ProjectStructure | Category::Documentation) => {
                AnalyzerKind::Documentation
            }
            (Self::Legacy, Category::Testing | Category::GitPractices) => {
                AnalyzerKind::VersionControl
            }
            (Self::Legacy, Category::Security | Category::CodeComplexity) => {
                AnalyzerKind::CodeQuality
            }
            (Self::Distinct, Category::ProjectStructure) => AnalyzerKind::Structure,
            (Self::Distinct, Category::Documentation) => AnalyzerKind::Documentation,
            (Self::Distinct, Category::Testing) => AnalyzerKind::Testing,
            (Self::Distinct, Category::GitPractices) => AnalyzerKind::VersionControl,
            (Self::Distinct, Category::Security) => AnalyzerKind::Security,
            (Self::Distinct, Category::CodeComplexity) => AnalyzerKind::Complexity,
        }
    }
}
