//! Game catalog: providers, game records, and the per-provider pools

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Number of provider columns
pub const PROVIDER_COUNT: usize = 3;

/// The three game providers, one carousel column each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Jili,
    PgSoft,
    PpSlot,
}

impl Provider {
    pub fn all() -> &'static [Provider] {
        &[Provider::Jili, Provider::PgSoft, Provider::PpSlot]
    }

    /// Display name, matching the provider tags in the catalog file
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Jili => "JILI",
            Provider::PgSoft => "PG Soft",
            Provider::PpSlot => "PP Slot",
        }
    }

    /// Column index (0..3) for this provider
    pub fn index(&self) -> usize {
        match self {
            Provider::Jili => 0,
            Provider::PgSoft => 1,
            Provider::PpSlot => 2,
        }
    }

    /// Parse a catalog provider tag
    pub fn from_name(name: &str) -> Option<Provider> {
        Provider::all().iter().copied().find(|p| p.name() == name)
    }
}

/// A single game entry from the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    /// Display title
    pub name: String,
    /// Thumbnail URL
    pub image: String,
    /// Which column this game belongs to
    pub provider: Provider,
    /// RTP percentage string like "96.71%", if the catalog carries one
    pub rtp: Option<String>,
}

impl Game {
    /// RTP badge text for display. JILI games without a catalog value get
    /// a random one in 96.50-98.00%, re-rolled on every rendered frame.
    pub fn rtp_badge(&self, rng: &mut impl Rng) -> Option<String> {
        match (&self.rtp, self.provider) {
            (Some(rtp), _) => Some(rtp.clone()),
            (None, Provider::Jili) => Some(random_rtp(rng)),
            (None, _) => None,
        }
    }
}

/// Random display RTP in the 96.50-98.00% band
pub fn random_rtp(rng: &mut impl Rng) -> String {
    format!("{:.2}%", rng.gen_range(96.5..98.0))
}

/// Optional site-level settings carried in the catalog file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    /// Page/header title
    pub title: Option<String>,
    /// Label for the spin button
    #[serde(rename = "randomBtnText")]
    pub random_btn_text: Option<String>,
    /// Where the active card's play link points
    #[serde(rename = "contactLink")]
    pub contact_link: Option<String>,
}

/// Raw game record as stored in the catalog file (provider as free text)
#[derive(Debug, Deserialize)]
struct RawGame {
    name: String,
    image: String,
    provider: String,
    #[serde(default)]
    rtp: Option<String>,
}

/// On-disk catalog shape: `{ "games": [...], "siteSettings": {...} }`
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    games: Vec<RawGame>,
    #[serde(rename = "siteSettings", default)]
    site_settings: Option<SiteSettings>,
}

/// The loaded catalog: all games plus site settings
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub games: Vec<Game>,
    pub site: SiteSettings,
}

impl Catalog {
    /// Load the catalog from a JSON file. Any failure yields an empty
    /// catalog: the picker starts with three empty columns and a spin
    /// request becomes a no-op.
    pub fn load(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!("Could not read catalog {}: {}", path.display(), e);
                return Self::default();
            }
        };
        match serde_json::from_str::<CatalogFile>(&contents) {
            Ok(file) => Self::from_file(file),
            Err(e) => {
                tracing::warn!("Could not parse catalog {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    fn from_file(file: CatalogFile) -> Self {
        let mut games = Vec::with_capacity(file.games.len());
        for raw in file.games {
            let Some(provider) = Provider::from_name(&raw.provider) else {
                tracing::warn!("Dropping game '{}': unknown provider '{}'", raw.name, raw.provider);
                continue;
            };
            games.push(Game {
                name: raw.name,
                image: raw.image,
                provider,
                rtp: raw.rtp,
            });
        }
        tracing::info!("Catalog loaded: {} games", games.len());
        Self {
            games,
            site: file.site_settings.unwrap_or_default(),
        }
    }
}

/// The catalog partitioned by provider. Built once at startup and never
/// mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct GamePool {
    pools: [Vec<Game>; PROVIDER_COUNT],
}

impl GamePool {
    pub fn new(games: &[Game]) -> Self {
        let mut pools: [Vec<Game>; PROVIDER_COUNT] = Default::default();
        for game in games {
            pools[game.provider.index()].push(game.clone());
        }
        Self { pools }
    }

    /// All games for one provider's column
    pub fn pool(&self, provider: Provider) -> &[Game] {
        &self.pools[provider.index()]
    }

    /// True when no provider has any games (empty/missing catalog)
    pub fn is_empty(&self) -> bool {
        self.pools.iter().all(|p| p.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn game(name: &str, provider: Provider) -> Game {
        Game {
            name: name.to_string(),
            image: format!("https://example.com/{}.png", name),
            provider,
            rtp: None,
        }
    }

    #[test]
    fn test_provider_names_round_trip() {
        for p in Provider::all() {
            assert_eq!(Provider::from_name(p.name()), Some(*p));
        }
        assert_eq!(Provider::from_name("Netent"), None);
    }

    #[test]
    fn test_pool_partition() {
        let games = vec![
            game("a1", Provider::Jili),
            game("b1", Provider::PgSoft),
            game("a2", Provider::Jili),
            game("c1", Provider::PpSlot),
        ];
        let pool = GamePool::new(&games);
        assert_eq!(pool.pool(Provider::Jili).len(), 2);
        assert_eq!(pool.pool(Provider::PgSoft).len(), 1);
        assert_eq!(pool.pool(Provider::PpSlot).len(), 1);
        assert!(!pool.is_empty());
        assert!(GamePool::new(&[]).is_empty());
    }

    #[test]
    fn test_rtp_badge_fallback() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let mut jili = game("fortune", Provider::Jili);
        let badge = jili.rtp_badge(&mut rng).unwrap();
        let value: f64 = badge.trim_end_matches('%').parse().unwrap();
        assert!((96.5..98.0).contains(&value), "badge out of band: {}", badge);

        jili.rtp = Some("95.00%".to_string());
        assert_eq!(jili.rtp_badge(&mut rng).as_deref(), Some("95.00%"));

        let pg = game("mahjong", Provider::PgSoft);
        assert_eq!(pg.rtp_badge(&mut rng), None);
    }

    #[test]
    fn test_catalog_parse_drops_unknown_provider() {
        let json = r#"{
            "games": [
                {"name": "Boxing King", "image": "u1", "provider": "JILI"},
                {"name": "Mystery", "image": "u2", "provider": "Acme"},
                {"name": "Sweet Bonanza", "image": "u3", "provider": "PP Slot", "rtp": "96.48%"}
            ],
            "siteSettings": {"title": "Lucky Picks", "randomBtnText": "SPIN!"}
        }"#;
        let file: CatalogFile = serde_json::from_str(json).unwrap();
        let catalog = Catalog::from_file(file);
        assert_eq!(catalog.games.len(), 2);
        assert_eq!(catalog.games[1].rtp.as_deref(), Some("96.48%"));
        assert_eq!(catalog.site.title.as_deref(), Some("Lucky Picks"));
        assert_eq!(catalog.site.contact_link, None);
    }

    #[test]
    fn test_missing_catalog_is_empty() {
        let catalog = Catalog::load(Path::new("/nonexistent/data.json"));
        assert!(catalog.games.is_empty());
    }
}
