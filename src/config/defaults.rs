//! System-wide default constants.
//!
//! Grouped by subsystem for easy discovery.

// ============================================================================
// Server
// ============================================================================

/// HTTP server bind address.
pub const SERVER_ADDR: &str = "0.0.0.0:8080";

// ============================================================================
// Knowledge Index
// ============================================================================

/// Qdrant collection holding the dispatch protocols.
pub const KNOWLEDGE_COLLECTION: &str = "knowledge_base";

/// HTTP client timeout for vector index requests (seconds).
pub const KNOWLEDGE_HTTP_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Chat Assistant
// ============================================================================

/// OpenAI-compatible endpoint of the hosted model.
pub const LLM_BASE_URL: &str = "https://api.groq.com/openai/v1";

pub const LLM_MODEL: &str = "llama-3.3-70b-versatile";

pub const LLM_SYSTEM_PROMPT: &str =
    "You are a professional emergency dispatch assistant. Be brief and tactical.";

pub const LLM_TEMPERATURE: f32 = 0.7;

pub const LLM_MAX_TOKENS: u32 = 500;

/// HTTP client timeout for chat completions (seconds).
pub const LLM_HTTP_TIMEOUT_SECS: u64 = 60;

// ============================================================================
// Sessions
// ============================================================================

/// Sessions with no request for this long are dropped (seconds).
pub const SESSION_IDLE_TTL_SECS: i64 = 30 * 60;

// ============================================================================
// Strategy Panel
// ============================================================================

/// Artificial "analysing historical data" pause before a strategy is shown (ms).
pub const STRATEGY_DELAY_MS: u64 = 1_500;

// ============================================================================
// Caller Geolocator
// ============================================================================

pub const CALLER_LATITUDE: f64 = 28.6139;

pub const CALLER_LONGITUDE: f64 = 77.2090;

pub const MAP_ZOOM: u8 = 12;

// ============================================================================
// Vitals Widgets
// ============================================================================

/// Samples in the live stress monitor series.
pub const STRESS_SAMPLES: usize = 25;

/// Mean / standard deviation of the stress monitor series.
pub const STRESS_MEAN: f64 = 75.0;
pub const STRESS_STD_DEV: f64 = 10.0;

/// Points in the 3D memory map scatter.
pub const MEMORY_MAP_POINTS: usize = 50;
