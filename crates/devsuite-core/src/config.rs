use anyhow::Context as _;

/// Trait for loading configuration from environment variables.
///
/// Implementors derive `serde::Deserialize`; field `database_url` is read from
/// `DATABASE_URL`. A `.env` file in the working directory is loaded first when
/// present, without overriding variables already set.
pub trait Config: Sized + serde::de::DeserializeOwned {
    fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        envy::from_env().context("failed to load config from environment")
    }

    /// Load from an explicit set of variables instead of the process environment.
    fn from_iter<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars).context("failed to load config from variables")
    }
}
