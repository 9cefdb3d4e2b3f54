use super::DataStoreProvider;
use crate::config::AppConfig;
use crate::ids;

/// Compile-time registration of a provider.
///
/// ```ignore
/// inventory::submit! {
///     ProviderEntry { factory: create_provider }
/// }
/// ```
pub struct ProviderEntry {
    pub factory: fn() -> Box<dyn DataStoreProvider>,
}

inventory::collect!(ProviderEntry);

pub struct ProviderLoader;

impl ProviderLoader {
    /// Instantiates every registered provider, ordered by id, leaving out the
    /// ones the configuration disables. Nothing is validated here.
    pub fn discover(config: &AppConfig) -> Vec<Box<dyn DataStoreProvider>> {
        let mut providers: Vec<Box<dyn DataStoreProvider>> = inventory::iter::<ProviderEntry>
            .into_iter()
            .map(|entry| (entry.factory)())
            .filter(|provider| Self::is_enabled(provider.as_ref(), config))
            .collect();

        providers.sort_by_cached_key(|provider| ids::id_key(provider.id()));

        log::info!("Discovered {} store provider(s)", providers.len());
        providers
    }

    fn is_enabled(provider: &dyn DataStoreProvider, config: &AppConfig) -> bool {
        if config.is_provider_disabled(provider.id()) {
            log::info!("Skipping store provider {} (disabled in config)", provider.id());
            return false;
        }
        true
    }
}
