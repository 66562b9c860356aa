//! Text or topics in, diagram artifacts out.

use crate::PipelineError;
use crate::structure::{RetryPolicy, Structured, TopicStructurer, structure_with_fallback};
use mindgraft_core::{BuildOptions, Graph, GraphBuilder, MindgraftConfig, Preprocessor, Topic};
use mindgraft_render::{
    JsonTree, LayoutOptions, RadialMindMapData, enhance_json_tree, enhance_topic_icons,
    layout_graph, to_flowchart_syntax, to_json_string, to_json_tree, to_mind_map_tree,
    validate_json_tree,
};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    Flowchart,
    Json,
    MindMap,
    #[default]
    All,
}

impl OutputFormat {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "flowchart" | "mermaid" => Some(Self::Flowchart),
            "json" => Some(Self::Json),
            "mindmap" | "mind-map" | "mindelixir" => Some(Self::MindMap),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    pub fn wants_flowchart(self) -> bool {
        matches!(self, Self::Flowchart | Self::All)
    }

    /// The mind map is only produced next to a valid JSON tree, so it needs one too.
    pub fn wants_json_tree(self) -> bool {
        matches!(self, Self::Json | Self::MindMap | Self::All)
    }

    pub fn wants_mind_map(self) -> bool {
        matches!(self, Self::MindMap | Self::All)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessOptions {
    pub enhance_icons: bool,
    pub correct_spelling: bool,
    pub optimize_layout: bool,
    pub output_format: OutputFormat,
    pub language: String,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            enhance_icons: true,
            correct_spelling: false,
            optimize_layout: false,
            output_format: OutputFormat::All,
            language: "en".to_string(),
        }
    }
}

impl ProcessOptions {
    pub fn from_config(config: &MindgraftConfig) -> Self {
        let d = Self::default();
        Self {
            enhance_icons: config.get_bool("output.enhance").unwrap_or(d.enhance_icons),
            language: config
                .get_str("output.language")
                .filter(|l| !l.trim().is_empty())
                .map(str::to_string)
                .unwrap_or(d.language),
            ..d
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessOutput {
    pub topics: Vec<Topic>,
    pub language: String,
    pub graph: Graph,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flowchart: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_tree: Option<JsonTree>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mind_map: Option<RadialMindMapData>,
}

impl ProcessOutput {
    pub fn to_json(&self, pretty: bool) -> Result<String, PipelineError> {
        Ok(to_json_string(self, pretty)?)
    }
}

/// The collaborators used by every stage.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    pub preprocessor: Preprocessor,
    pub builder: GraphBuilder,
    pub layout: LayoutOptions,
}

impl Pipeline {
    pub fn from_config(config: &MindgraftConfig) -> Self {
        Self {
            preprocessor: Preprocessor::default(),
            builder: GraphBuilder::new(BuildOptions::from_config(config)),
            layout: LayoutOptions::from_config(config),
        }
    }

    pub fn with_preprocessor(mut self, preprocessor: Preprocessor) -> Self {
        self.preprocessor = preprocessor;
        self
    }

    pub fn with_builder(mut self, builder: GraphBuilder) -> Self {
        self.builder = builder;
        self
    }

    /// Local path: heuristic structuring of `text`, then [`process_topics`](Self::process_topics).
    pub fn process_content(
        &self,
        text: &str,
        options: &ProcessOptions,
    ) -> Result<ProcessOutput, PipelineError> {
        let topics = self.preprocessor.build_hierarchy_from_text(text);
        self.process_topics(topics, options)
    }

    /// Service path with retries; falls back to the local heuristics when the service fails.
    pub fn process_with_structurer(
        &self,
        text: &str,
        service: &dyn TopicStructurer,
        policy: &RetryPolicy,
        options: &ProcessOptions,
    ) -> Result<(ProcessOutput, Structured), PipelineError> {
        let structured = structure_with_fallback(text, service, policy, &self.preprocessor);
        let output = self.process_topics(structured.topics.clone(), options)?;
        Ok((output, structured))
    }

    pub fn process_topics(
        &self,
        topics: Vec<Topic>,
        options: &ProcessOptions,
    ) -> Result<ProcessOutput, PipelineError> {
        let _span = tracing::debug_span!(
            "process",
            topics = topics.len(),
            format = ?options.output_format
        )
        .entered();

        let mut topics = topics;
        if options.correct_spelling {
            topics = self.preprocessor.correct_forest(&topics);
        }
        if options.enhance_icons {
            topics = enhance_topic_icons(&topics);
        }

        let mut graph = if topics.is_empty() {
            tracing::info!("no topics to draw; emitting an empty graph");
            Graph::default()
        } else {
            self.builder.build(&topics)?
        };
        if options.optimize_layout {
            graph = layout_graph(&graph, &self.layout);
        }

        let format = options.output_format;
        let flowchart = format.wants_flowchart().then(|| to_flowchart_syntax(&graph));

        let mut json_tree = None;
        let mut mind_map = None;
        if format.wants_json_tree() {
            let tree = to_json_tree(&topics, &options.language);
            if validate_json_tree(&tree) {
                json_tree = Some(enhance_json_tree(&tree));
                if format.wants_mind_map() {
                    mind_map = Some(to_mind_map_tree(&topics, &options.language));
                }
            } else {
                tracing::info!("json tree did not validate; tree and mind map omitted");
            }
        }

        Ok(ProcessOutput {
            topics,
            language: options.language.clone(),
            graph,
            flowchart,
            json_tree,
            mind_map,
        })
    }
}

/// [`Pipeline::process_content`] with default collaborators.
pub fn process_content(text: &str, options: &ProcessOptions) -> Result<ProcessOutput, PipelineError> {
    Pipeline::default().process_content(text, options)
}
