#[derive(clap::ValueEnum, Clone, Debug, Copy)]
pub enum CargoEnv {
    Development,
    Production,
}

#[derive(clap::Parser)]
pub struct AppConfig {
    // production or development
    #[clap(long, env, value_enum)]
    pub cargo_env: CargoEnv,

    // port that the app will bind to
    #[clap(long, env, default_value = "5000")]
    pub port: u16,

    // sqlite file the reviews, achievements and analytics live in, created if it's missing
    #[clap(long, env, default_value = "sqlite://data/cinereview.db")]
    pub database_url: String,

    // option to run migrations on each startup
    #[clap(long, env)]
    pub run_migrations: bool,

    // used to verify the bearer tokens handed out by the auth provider, have it be anything
    // secure like 'openssl rand -base64 32'
    #[clap(long, env)]
    pub access_token_secret: String,

    // this should be either * for allowing everything, or a comma seperated list of domains like
    // https://example.com,https://something.com
    #[clap(long, env, default_value = "*")]
    pub cors_origin: String,

    // requests taking longer than this get a 408
    #[clap(long, env, default_value = "30")]
    pub request_timeout_secs: u64,

    // optional sentry integration
    #[clap(long, env)]
    pub sentry_dsn: Option<String>,
}

impl Default for AppConfig {
    // only really used by tests, everything real goes through clap
    fn default() -> Self {
        Self {
            cargo_env: CargoEnv::Development,
            port: 5000,
            database_url: "sqlite://data/cinereview.db".to_string(),
            run_migrations: true,
            access_token_secret: "default-access-secret".to_string(),
            cors_origin: "*".to_string(),
            request_timeout_secs: 30,
            sentry_dsn: None,
        }
    }
}
