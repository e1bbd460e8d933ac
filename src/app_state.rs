use crate::config::Config;
use crate::data_seeder;
use crate::gateway::{DataGateway, MemoryGateway, PostgresGateway};
use crate::repository::{CommentRepository, PostRepository, ProfileDirectory};
use crate::storage::{DiskMediaStore, ImageUploader};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn DataGateway>,
    pub posts: PostRepository,
    pub comments: CommentRepository,
    pub profiles: Arc<ProfileDirectory>,
    pub uploader: ImageUploader,
    pub config: Config,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        // Pick the backend: a hosted database when configured, otherwise the
        // in-memory gateway with seeded demo data.
        let gateway: Arc<dyn DataGateway> = match &config.database.url {
            Some(url) => {
                let gateway = PostgresGateway::connect(url).await?;
                gateway.migrate().await?;
                info!("connected to database backend");
                Arc::new(gateway)
            }
            None => {
                let gateway = MemoryGateway::new();
                data_seeder::seed_demo_data(&gateway).await?;
                info!("running against the in-memory gateway with demo data");
                Arc::new(gateway)
            }
        };

        let profiles = Arc::new(ProfileDirectory::new(
            gateway.clone(),
            config.cache.profile_capacity,
        ));
        let posts = PostRepository::new(gateway.clone(), profiles.clone());
        let comments = CommentRepository::new(gateway.clone(), profiles.clone());
        let uploader = ImageUploader::new(Arc::new(DiskMediaStore::new(
            &config.media.root,
            &config.media.base_url,
        )));

        Ok(Self {
            gateway,
            posts,
            comments,
            profiles,
            uploader,
            config,
        })
    }
}
