use crate::config::Config;
use crate::render::{ChartRenderer, FontFace};
use crate::source::MakerApi;
use crate::voting::VoteAggregator;
use log::info;

// Everything a handler needs, shared across spawned interaction tasks
pub struct Services {
    pub aggregator: VoteAggregator<MakerApi>,
    pub renderer: ChartRenderer<FontFace>,
    pub config: Config,
}

impl Services {
    pub fn new(config: Config) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let source = MakerApi::new(&config.api_url, &config.tags_url)?;
        let face = FontFace::load(&config.font_path)?;
        info!("Using governance API at {} and chart font {}", config.api_url, config.font_path);

        Ok(Self {
            aggregator: VoteAggregator::new(source),
            renderer: ChartRenderer::new(face),
            config,
        })
    }
}
