use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Tunables for a verification run.
///
/// `Default` gives the production values; `from_env` lets each be overridden
/// through a `HACKCHECK_*` variable without recompiling.
#[derive(Debug, Clone)]
pub struct VerifierConfig {
    /// Weighted score below which a submission is flagged.
    pub pass_threshold: f64,
    /// Score assigned when no claim carries signal either way.
    pub neutral_score: f64,
    /// Grace period subtracted from the event start when checking for
    /// pre-existing commits.
    pub start_tolerance: chrono::Duration,
    /// Maximum deep-verification checks in flight per submission.
    pub tier2_concurrency: usize,
    /// Files inspected per claim during deep verification.
    pub tier2_max_files: usize,
    /// Bytes read from a single file during deep verification.
    pub tier2_file_bytes: usize,
    /// Total bytes of source a single submission may spend on deep checks.
    pub tier2_byte_budget: usize,
    /// Attempts per provider call before giving up (first try included).
    pub provider_attempts: u32,
    /// Base delay for exponential backoff between provider attempts.
    pub backoff_base: Duration,
    /// Hard ceiling on a single language model call.
    pub model_timeout: Duration,
    /// Hard ceiling on one submission end to end.
    pub submission_timeout: Duration,
    /// Submissions verified in parallel by `verify_batch`.
    pub batch_concurrency: usize,
    /// Narrative segments offered to the classifier per submission.
    pub max_claim_candidates: usize,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            pass_threshold: 0.6,
            neutral_score: 0.5,
            start_tolerance: chrono::Duration::zero(),
            tier2_concurrency: 3,
            tier2_max_files: 4,
            tier2_file_bytes: 16 * 1024,
            tier2_byte_budget: 96 * 1024,
            provider_attempts: 3,
            backoff_base: Duration::from_millis(250),
            model_timeout: Duration::from_secs(20),
            submission_timeout: Duration::from_secs(120),
            batch_concurrency: 4,
            max_claim_candidates: 24,
        }
    }
}

impl VerifierConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        Self {
            pass_threshold: env_parse("HACKCHECK_PASS_THRESHOLD", defaults.pass_threshold),
            neutral_score: env_parse("HACKCHECK_NEUTRAL_SCORE", defaults.neutral_score),
            start_tolerance: chrono::Duration::seconds(env_parse(
                "HACKCHECK_START_TOLERANCE_SECS",
                defaults.start_tolerance.num_seconds(),
            )),
            tier2_concurrency: env_parse("HACKCHECK_TIER2_CONCURRENCY", defaults.tier2_concurrency),
            tier2_max_files: env_parse("HACKCHECK_TIER2_MAX_FILES", defaults.tier2_max_files),
            tier2_file_bytes: env_parse("HACKCHECK_TIER2_FILE_BYTES", defaults.tier2_file_bytes),
            tier2_byte_budget: env_parse("HACKCHECK_TIER2_BYTE_BUDGET", defaults.tier2_byte_budget),
            provider_attempts: env_parse("HACKCHECK_PROVIDER_ATTEMPTS", defaults.provider_attempts),
            backoff_base: Duration::from_millis(env_parse(
                "HACKCHECK_BACKOFF_BASE_MS",
                defaults.backoff_base.as_millis() as u64,
            )),
            model_timeout: Duration::from_secs(env_parse(
                "HACKCHECK_MODEL_TIMEOUT_SECS",
                defaults.model_timeout.as_secs(),
            )),
            submission_timeout: Duration::from_secs(env_parse(
                "HACKCHECK_SUBMISSION_TIMEOUT_SECS",
                defaults.submission_timeout.as_secs(),
            )),
            batch_concurrency: env_parse("HACKCHECK_BATCH_CONCURRENCY", defaults.batch_concurrency),
            max_claim_candidates: env_parse(
                "HACKCHECK_MAX_CLAIM_CANDIDATES",
                defaults.max_claim_candidates,
            ),
        }
    }
}

/// Endpoints and credentials for the external providers.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub github_base_url: String,
    /// Optional token; unauthenticated requests work against public repos at
    /// a much lower rate limit.
    pub github_token: Option<String>,
    pub gemini_base_url: String,
    pub gemini_api_key: String,
    pub gemini_model: String,
}

impl ProviderConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            github_base_url: env::var("GITHUB_API_URL")
                .unwrap_or_else(|_| "https://api.github.com".to_string()),
            github_token: env::var("GITHUB_TOKEN").ok(),
            gemini_base_url: env::var("GEMINI_API_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string()),
            gemini_api_key: env::var("GEMINI_API_KEY").unwrap_or_default(),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-2.0-flash".to_string()),
        }
    }
}

fn env_parse<T: FromStr + Copy>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}
