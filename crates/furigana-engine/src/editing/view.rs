use crate::editing::{Cmd, EditError, EditorState, UpdateFlags};
use crate::markup::Matcher;
use crate::overlay::{DecorationError, DecorationSet, FuriganaOverlay};

#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error(transparent)]
    Decoration(#[from] DecorationError),
}

/// State handed to plugins after each applied command.
#[derive(Debug, Clone, Copy)]
pub struct ViewUpdate<'a> {
    pub state: &'a EditorState,
    pub flags: UpdateFlags,
}

impl ViewUpdate<'_> {
    pub fn doc_changed(&self) -> bool {
        self.flags.doc_changed
    }

    pub fn viewport_changed(&self) -> bool {
        self.flags.viewport_changed
    }

    pub fn selection_set(&self) -> bool {
        self.flags.selection_set
    }
}

/// A view-layer unit that keeps decorations in step with the editor state.
pub trait ViewPlugin {
    fn update(&mut self, update: &ViewUpdate<'_>) -> Result<(), DecorationError>;
    fn decorations(&self) -> &DecorationSet;
}

/// Which optional view plugins are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtensionConfig {
    pub furigana_overlay: bool,
}

impl ExtensionConfig {
    /// Derive the extension set from the "show annotations while editing" preference.
    pub fn from_preference(furigana_source: bool) -> Self {
        Self {
            furigana_overlay: furigana_source,
        }
    }
}

/// Host view: owns the editor state and the active plugin list.
pub struct EditorView {
    state: EditorState,
    matcher: Matcher,
    config: ExtensionConfig,
    plugins: Vec<Box<dyn ViewPlugin>>,
}

impl EditorView {
    pub fn new(state: EditorState, config: ExtensionConfig) -> Result<Self, ViewError> {
        Self::with_matcher(state, config, Matcher::default())
    }

    pub fn with_matcher(
        state: EditorState,
        config: ExtensionConfig,
        matcher: Matcher,
    ) -> Result<Self, ViewError> {
        let mut view = Self {
            state,
            matcher,
            config,
            plugins: Vec::new(),
        };
        view.reconfigure(config)?;
        Ok(view)
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn config(&self) -> ExtensionConfig {
        self.config
    }

    /// Apply a command and feed the resulting update to every active plugin.
    pub fn dispatch(&mut self, cmd: Cmd) -> Result<UpdateFlags, ViewError> {
        let flags = self.state.apply(cmd)?;
        let update = ViewUpdate {
            state: &self.state,
            flags,
        };
        for plugin in &mut self.plugins {
            plugin.update(&update)?;
        }
        Ok(flags)
    }

    /// Re-derive the plugin list from `config`.
    ///
    /// Newly added plugins compute their decorations from the current state,
    /// so the next draw reflects the change. The buffer is never touched.
    pub fn reconfigure(&mut self, config: ExtensionConfig) -> Result<(), ViewError> {
        let mut plugins: Vec<Box<dyn ViewPlugin>> = Vec::new();
        if config.furigana_overlay {
            plugins.push(Box::new(FuriganaOverlay::new(
                self.matcher.clone(),
                &self.state,
            )?));
        }
        log::debug!(
            "view reconfigured: furigana overlay {}",
            if config.furigana_overlay { "on" } else { "off" }
        );
        self.plugins = plugins;
        self.config = config;
        Ok(())
    }

    /// All active decorations in ascending offset order.
    pub fn decorations(&self) -> DecorationSet {
        DecorationSet::merge(self.plugins.iter().map(|p| p.decorations()))
    }
}
