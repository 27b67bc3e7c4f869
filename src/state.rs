use crate::config::AppConfig;
use crate::recipes::source::{MealDbClient, RecipeSource};
use crate::session::Session;
use crate::storage::{FileStore, KeyValueStore};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub session: Arc<Mutex<Session>>,
    pub recipes: Arc<dyn RecipeSource>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let kv = Arc::new(FileStore::open(&config.data_dir)?) as Arc<dyn KeyValueStore>;
        let recipes = Arc::new(MealDbClient::new(
            config.recipe_api.base_url.clone(),
            config.recipe_api.timeout,
        )?) as Arc<dyn RecipeSource>;

        tracing::info!(data_dir = %config.data_dir.display(), "opening session");
        let session = Session::open(kv);
        session.spawn_change_log();
        let session = Arc::new(Mutex::new(session));

        Ok(Self {
            config,
            session,
            recipes,
        })
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::config::{parse_base_url, RecipeApiConfig};
        use crate::recipes::model::{Category, Recipe};
        use crate::recipes::source::StaticRecipeSource;
        use crate::storage::MemoryStore;

        let mut pie = Recipe::summary("52772", "Chicken Pie", "https://fake.local/pie.jpg");
        pie.category = Some("Chicken".into());
        pie.area = Some("British".into());
        let mut curry = Recipe::summary("52773", "Chicken Curry", "https://fake.local/curry.jpg");
        curry.category = Some("Chicken".into());
        curry.area = Some("Indian".into());

        let recipes = Arc::new(StaticRecipeSource {
            recipes: vec![pie, curry],
            categories: vec![Category {
                id: "1".into(),
                name: "Chicken".into(),
                image: "https://fake.local/chicken.png".into(),
                description: "Birds".into(),
            }],
        }) as Arc<dyn RecipeSource>;

        let config = Arc::new(AppConfig {
            bind_addr: ([127, 0, 0, 1], 0).into(),
            data_dir: "fake".into(),
            recipe_api: RecipeApiConfig {
                base_url: parse_base_url("https://fake.local/api").expect("static url"),
                timeout: std::time::Duration::from_secs(1),
            },
        });

        let kv = Arc::new(MemoryStore::new()) as Arc<dyn KeyValueStore>;
        Self {
            config,
            session: Arc::new(Mutex::new(Session::open(kv))),
            recipes,
        }
    }
}
