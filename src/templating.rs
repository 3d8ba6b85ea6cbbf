use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use std::{collections::HashMap, path::PathBuf, sync::Arc, time::SystemTime};
use tokio::sync::RwLock;
use tracing::{debug, error, info};
use walkdir::WalkDir;

type Partials = liquid::partials::EagerCompiler<liquid::partials::InMemorySource>;

const PARTIALS_DIR: &str = "partials";

pub struct TemplateEngine {
    template_dir: PathBuf,
    cache: Arc<RwLock<HashMap<String, CachedTemplate>>>,
}

struct CachedTemplate {
    content: String,
    modified: SystemTime,
}

impl TemplateEngine {
    pub fn new(template_dir: PathBuf) -> Self {
        Self {
            template_dir,
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    async fn load_template(&self, path: &str) -> Result<String, String> {
        let template_path = self.template_dir.join(path);

        let metadata = tokio::fs::metadata(&template_path)
            .await
            .map_err(|e| format!("Failed to get metadata for {}: {}", path, e))?;

        let modified = metadata
            .modified()
            .map_err(|e| format!("Failed to get modified time: {}", e))?;

        let mut cache = self.cache.write().await;

        if let Some(cached) = cache.get(path)
            && cached.modified >= modified
        {
            debug!("Using cached template for {}", path);
            return Ok(cached.content.clone());
        }

        info!("Loading template: {}", path);

        let content = tokio::fs::read_to_string(&template_path)
            .await
            .map_err(|e| format!("Failed to read template {}: {}", path, e))?;

        cache.insert(
            path.to_string(),
            CachedTemplate {
                content: content.clone(),
                modified,
            },
        );

        Ok(content)
    }

    /// Every `*.liquid` file under `partials/`, registered by file name.
    async fn load_partials(&self) -> Partials {
        let mut partials = Partials::empty();
        let partials_dir = self.template_dir.join(PARTIALS_DIR);

        let files: Vec<String> = WalkDir::new(&partials_dir)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let name = entry.file_name().to_str()?.to_string();
                name.ends_with(".liquid").then_some(name)
            })
            .collect();

        for name in files {
            let relative = format!("{}/{}", PARTIALS_DIR, name);
            match self.load_template(&relative).await {
                Ok(content) => {
                    partials.add(name, content);
                }
                Err(e) => error!("Failed to load partial {}: {}", relative, e),
            }
        }

        partials
    }

    pub async fn render_template(
        &self,
        template_name: &str,
        globals: liquid::Object,
    ) -> Result<String, String> {
        let template_content = self.load_template(template_name).await?;

        let parser = liquid::ParserBuilder::with_stdlib()
            .partials(self.load_partials().await)
            .build()
            .map_err(|e| format!("Failed to create parser: {}", e))?;

        let template = parser
            .parse(&template_content)
            .map_err(|e| format!("Failed to parse template: {}", e))?;

        template
            .render(&globals)
            .map_err(|e| format!("Failed to render template: {}", e))
    }

    /// Renders a page template into a response with `status`. Rendering
    /// failures become a bare 500.
    pub async fn render_page(
        &self,
        template_name: &str,
        globals: liquid::Object,
        status: StatusCode,
    ) -> Response {
        match self.render_template(template_name, globals).await {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => {
                error!("Template rendering error for {}: {}", template_name, e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}
