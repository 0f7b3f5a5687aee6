//! Technology signature catalog
//!
//! Static lookup tables the tier-1 collector uses to resolve technology
//! claims against repository metadata: which manifest entries, file
//! extensions and marker files count as evidence for a named technology.

/// Manifest files fetched once per run and shared across claims.
/// Matched against the final path segment at depth <= 2.
pub const MANIFEST_FILES: &[&str] = &[
    "package.json",
    "requirements.txt",
    "pyproject.toml",
    "setup.py",
    "Pipfile",
    "go.mod",
    "Cargo.toml",
    "pom.xml",
    "build.gradle",
    "Gemfile",
    "composer.json",
    "pubspec.yaml",
    "tsconfig.json",
];

/// How to recognize one technology from repository metadata
#[derive(Debug, Clone, Copy)]
pub struct TechSignature {
    /// Canonical lowercase name matched against claim text on token
    /// boundaries
    pub name: &'static str,
    /// Substrings searched case-insensitively inside manifest contents
    pub keywords: &'static [&'static str],
    /// File extensions (lowercase, no dot) counted in the tree
    pub extensions: &'static [&'static str],
    /// Exact file names whose presence alone confirms the claim
    pub marker_files: &'static [&'static str],
}

/// First match wins, so more specific names sit above their prefixes
/// (`javascript` above `java`, `c++` above `c`).
const CATALOG: &[TechSignature] = &[
    TechSignature {
        name: "next.js",
        keywords: &["next"],
        extensions: &[],
        marker_files: &["next.config.js", "next.config.mjs", "next.config.ts"],
    },
    TechSignature {
        name: "react",
        keywords: &["react", "react-dom"],
        extensions: &["jsx"],
        marker_files: &[],
    },
    TechSignature {
        name: "vue",
        keywords: &["vue"],
        extensions: &["vue"],
        marker_files: &[],
    },
    TechSignature {
        name: "angular",
        keywords: &["@angular/core"],
        extensions: &[],
        marker_files: &["angular.json"],
    },
    TechSignature {
        name: "typescript",
        keywords: &["typescript"],
        extensions: &["ts", "tsx"],
        marker_files: &["tsconfig.json"],
    },
    TechSignature {
        name: "javascript",
        keywords: &[],
        extensions: &["js", "jsx", "mjs"],
        marker_files: &[],
    },
    TechSignature {
        name: "tailwind",
        keywords: &["tailwindcss"],
        extensions: &[],
        marker_files: &["tailwind.config.js", "tailwind.config.ts"],
    },
    TechSignature {
        name: "node.js",
        keywords: &[],
        extensions: &[],
        marker_files: &["package.json"],
    },
    TechSignature {
        name: "express",
        keywords: &["express"],
        extensions: &[],
        marker_files: &[],
    },
    TechSignature {
        name: "python",
        keywords: &["python"],
        extensions: &["py"],
        marker_files: &["requirements.txt", "pyproject.toml", "setup.py", "Pipfile"],
    },
    TechSignature {
        name: "flask",
        keywords: &["flask"],
        extensions: &[],
        marker_files: &[],
    },
    TechSignature {
        name: "django",
        keywords: &["django"],
        extensions: &[],
        marker_files: &["manage.py"],
    },
    TechSignature {
        name: "fastapi",
        keywords: &["fastapi"],
        extensions: &[],
        marker_files: &[],
    },
    TechSignature {
        name: "mongodb",
        keywords: &["mongodb", "mongoose", "pymongo"],
        extensions: &[],
        marker_files: &[],
    },
    TechSignature {
        name: "postgresql",
        keywords: &["psycopg2", "postgres", "pg"],
        extensions: &[],
        marker_files: &[],
    },
    TechSignature {
        name: "mysql",
        keywords: &["mysql"],
        extensions: &[],
        marker_files: &[],
    },
    TechSignature {
        name: "redis",
        keywords: &["redis"],
        extensions: &[],
        marker_files: &[],
    },
    TechSignature {
        name: "firebase",
        keywords: &["firebase"],
        extensions: &[],
        marker_files: &[],
    },
    TechSignature {
        name: "supabase",
        keywords: &["supabase"],
        extensions: &[],
        marker_files: &[],
    },
    TechSignature {
        name: "aws",
        keywords: &["boto3", "aws-sdk", "amazonaws"],
        extensions: &[],
        marker_files: &[],
    },
    TechSignature {
        name: "gemini",
        keywords: &["google-generativeai", "generative-ai", "gemini"],
        extensions: &[],
        marker_files: &[],
    },
    TechSignature {
        name: "openai",
        keywords: &["openai"],
        extensions: &[],
        marker_files: &[],
    },
    TechSignature {
        name: "opencv",
        keywords: &["opencv-python", "opencv", "cv2"],
        extensions: &[],
        marker_files: &[],
    },
    TechSignature {
        name: "tensorflow",
        keywords: &["tensorflow"],
        extensions: &[],
        marker_files: &[],
    },
    TechSignature {
        name: "pytorch",
        keywords: &["pytorch", "torch"],
        extensions: &[],
        marker_files: &[],
    },
    TechSignature {
        name: "flutter",
        keywords: &["flutter"],
        extensions: &["dart"],
        marker_files: &["pubspec.yaml"],
    },
    TechSignature {
        name: "kotlin",
        keywords: &["kotlin"],
        extensions: &["kt"],
        marker_files: &[],
    },
    TechSignature {
        name: "java",
        keywords: &[],
        extensions: &["java"],
        marker_files: &["pom.xml", "build.gradle"],
    },
    TechSignature {
        name: "go",
        keywords: &[],
        extensions: &["go"],
        marker_files: &["go.mod", "go.sum"],
    },
    TechSignature {
        name: "rust",
        keywords: &[],
        extensions: &["rs"],
        marker_files: &["Cargo.toml"],
    },
    TechSignature {
        name: "c++",
        keywords: &[],
        extensions: &["cpp", "cc", "cxx", "hpp"],
        marker_files: &[],
    },
    TechSignature {
        name: "c",
        keywords: &[],
        extensions: &["c", "h"],
        marker_files: &[],
    },
    TechSignature {
        name: "swift",
        keywords: &[],
        extensions: &["swift"],
        marker_files: &[],
    },
    TechSignature {
        name: "arduino",
        keywords: &[],
        extensions: &["ino"],
        marker_files: &[],
    },
    TechSignature {
        name: "esp32",
        keywords: &["esp32"],
        extensions: &["ino"],
        marker_files: &[],
    },
    TechSignature {
        name: "docker",
        keywords: &[],
        extensions: &[],
        marker_files: &["Dockerfile", "docker-compose.yml", "docker-compose.yaml"],
    },
    TechSignature {
        name: "solidity",
        keywords: &["solidity"],
        extensions: &["sol"],
        marker_files: &["hardhat.config.js", "foundry.toml"],
    },
    TechSignature {
        name: "unity",
        keywords: &["unity"],
        extensions: &["unity"],
        marker_files: &[],
    },
];

/// Find the signature a technology claim talks about, if the catalog
/// knows it. Matching is on token boundaries so `java` does not fire
/// inside `javascript`.
pub fn lookup(claim_text: &str) -> Option<&'static TechSignature> {
    let normalized = claim_text.to_lowercase();
    CATALOG.iter().find(|sig| contains_name(&normalized, sig.name))
}

/// Whether a file name is one of the shared dependency manifests
pub fn is_manifest(file_name: &str) -> bool {
    MANIFEST_FILES.iter().any(|m| *m == file_name)
}

fn contains_name(text: &str, name: &str) -> bool {
    let bytes = text.as_bytes();
    let mut start = 0;
    while let Some(pos) = text[start..].find(name) {
        let begin = start + pos;
        let end = begin + name.len();
        let before_ok = begin == 0 || !bytes[begin - 1].is_ascii_alphanumeric();
        let after_ok = end == text.len() || !bytes[end].is_ascii_alphanumeric();
        if before_ok && after_ok {
            return true;
        }
        start = end;
    }
    false
}
