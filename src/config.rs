use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// PostgreSQL database connection URL. Profiles are kept in memory when unset.
    #[serde(default)]
    pub database_url: Option<String>,

    /// TMDB API read access token (sent as a bearer token)
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Language requested from TMDB
    #[serde(default = "default_tmdb_language")]
    pub tmdb_language: String,

    /// Per-request timeout for TMDB calls, in seconds
    #[serde(default = "default_tmdb_timeout_secs")]
    pub tmdb_timeout_secs: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of recommendations returned when a request doesn't ask for a limit
    #[serde(default = "default_recommendation_limit")]
    pub recommendation_limit: usize,

    /// Largest limit a request may ask for
    #[serde(default = "default_max_recommendation_limit")]
    pub max_recommendation_limit: usize,

    /// Bucket receiving uploaded posters. Credentials come from the usual AWS_* variables.
    #[serde(default = "default_s3_bucket_name")]
    pub s3_bucket_name: String,

    #[serde(default = "default_aws_region")]
    pub aws_region: String,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_language() -> String {
    "en-US".to_string()
}

fn default_tmdb_timeout_secs() -> u64 {
    10
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_recommendation_limit() -> usize {
    10
}

fn default_max_recommendation_limit() -> usize {
    50
}

fn default_s3_bucket_name() -> String {
    "moviemate-assets".to_string()
}

fn default_aws_region() -> String {
    "us-east-1".to_string()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Socket address the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_values() {
        let vars = vec![("tmdb_api_key".to_string(), "token".to_string())];
        let config: Config = envy::from_iter(vars).unwrap();

        assert_eq!(config.tmdb_api_key, "token");
        assert_eq!(config.tmdb_api_url, "https://api.themoviedb.org/3");
        assert_eq!(config.tmdb_language, "en-US");
        assert_eq!(config.recommendation_limit, 10);
        assert_eq!(config.max_recommendation_limit, 50);
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.database_url, None);
        assert_eq!(config.s3_bucket_name, "moviemate-assets");
        assert_eq!(config.aws_region, "us-east-1");
    }

    #[test]
    fn test_missing_api_key_is_an_error() {
        let vars: Vec<(String, String)> = vec![("port".to_string(), "8080".to_string())];
        let result = envy::from_iter::<_, Config>(vars);
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides() {
        let vars = vec![
            ("tmdb_api_key".to_string(), "token".to_string()),
            ("port".to_string(), "8080".to_string()),
            ("recommendation_limit".to_string(), "20".to_string()),
            ("s3_bucket_name".to_string(), "posters-prod".to_string()),
            ("aws_region".to_string(), "eu-west-1".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.recommendation_limit, 20);
        assert_eq!(config.s3_bucket_name, "posters-prod");
        assert_eq!(config.aws_region, "eu-west-1");
    }
}
