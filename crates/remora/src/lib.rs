#![forbid(unsafe_code)]

//! `remora` is an embeddable link-analysis graph component for host applications.
//!
//! The crate pairs the bridge protocol from `remora-core` with a host-pluggable transport:
//! the host hands the component a [`component::ComponentBridge`], describes a graph with
//! typed styles, a layout pick, and event subscriptions, and gets back the interaction (if
//! any) the embedded renderer reported. All renderer vocabulary stays behind this boundary.

pub use remora_core::*;

pub mod component {
    use serde_json::Value;

    use remora_core::bridge;
    use remora_core::{
        BridgeConfig, EdgeStyle, Elements, EventRecord, EventSub, Layout, LayoutRegistry,
        NodeStyle, Subscriptions, build_style, build_subscriptions,
    };

    /// Transport faults are host-defined; they cross this boundary boxed.
    pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

    #[derive(Debug, thiserror::Error)]
    pub enum ComponentError {
        #[error(transparent)]
        Config(#[from] remora_core::Error),
        #[error("bridge transport failed: {0}")]
        Transport(#[from] TransportError),
    }

    pub type Result<T> = std::result::Result<T, ComponentError>;

    /// Host-side transport seam: delivers one configuration to the renderer and returns
    /// its raw response.
    ///
    /// One call is one full round trip. An idle response (`null` or an empty object) means
    /// the renderer has nothing to report yet; the component decodes it to `None`.
    pub trait ComponentBridge {
        fn exchange(&self, request: &BridgeRequest) -> std::result::Result<Value, TransportError>;
    }

    impl<B: ComponentBridge + ?Sized> ComponentBridge for &B {
        fn exchange(&self, request: &BridgeRequest) -> std::result::Result<Value, TransportError> {
            (**self).exchange(request)
        }
    }

    /// The outbound package for one render pass: wire payload plus the host's correlation
    /// key, so transports that multiplex several component instances can route responses.
    #[derive(Debug, Clone, PartialEq)]
    pub struct BridgeRequest {
        pub config: BridgeConfig,
        pub key: Option<String>,
    }

    impl BridgeRequest {
        /// Canonical wire JSON of the payload. Hosts compare these strings to detect
        /// renders that would not change anything on the renderer side.
        pub fn wire_json(&self) -> remora_core::Result<String> {
            self.config.to_wire_json()
        }
    }

    /// Declarative inputs for one render pass.
    #[derive(Debug, Clone, PartialEq)]
    pub struct RenderParams {
        pub elements: Elements,
        pub layout: Layout,
        pub node_styles: Vec<NodeStyle>,
        pub edge_styles: Vec<EdgeStyle>,
        pub height_px: i32,
        pub events: Vec<EventSub>,
    }

    impl Default for RenderParams {
        fn default() -> Self {
            Self {
                elements: Elements::default(),
                layout: Layout::default(),
                node_styles: Vec::new(),
                edge_styles: Vec::new(),
                height_px: remora_core::DEFAULT_HEIGHT_PX,
                events: Vec::new(),
            }
        }
    }

    /// Convenience wrapper that bundles a transport, a layout catalog, and an optional
    /// instance key behind one render call.
    ///
    /// It stays runtime-agnostic: validation and encoding are CPU-bound, and the only I/O
    /// happens inside the host's [`ComponentBridge`].
    pub struct LinkAnalysis<B> {
        bridge: B,
        layouts: LayoutRegistry,
        key: Option<String>,
    }

    impl<B: ComponentBridge> LinkAnalysis<B> {
        pub fn new(bridge: B) -> Self {
            Self {
                bridge,
                layouts: LayoutRegistry::default_catalog(),
                key: None,
            }
        }

        /// Stable instance key, forwarded with every request. Hosts embedding several
        /// components use it to keep renderer state attached to the right instance.
        pub fn with_key(mut self, key: impl Into<String>) -> Self {
            self.key = Some(key.into());
            self
        }

        /// Replaces the layout catalog, for hosts whose renderer builds bundle extra
        /// layout plugins.
        pub fn with_layouts(mut self, layouts: LayoutRegistry) -> Self {
            self.layouts = layouts;
            self
        }

        pub fn layouts(&self) -> &LayoutRegistry {
            &self.layouts
        }

        /// Validates and encodes one render pass without exchanging it, for hosts that
        /// drive the transport themselves.
        pub fn prepare(&self, params: RenderParams) -> Result<BridgeRequest> {
            Ok(self.assemble(params)?.0)
        }

        /// Synchronous render helper (executor-free): validate, encode, exchange once,
        /// decode the response.
        pub fn render_sync(&self, params: RenderParams) -> Result<Option<EventRecord>> {
            let (request, subscriptions) = self.assemble(params)?;
            tracing::debug!(
                target: "remora",
                key = self.key.as_deref(),
                events = subscriptions.len(),
                "sending bridge configuration"
            );
            let raw = self.bridge.exchange(&request)?;
            let record = bridge::decode_response(&raw, &subscriptions)?;
            tracing::debug!(
                target: "remora",
                key = self.key.as_deref(),
                interacted = record.is_some(),
                "render pass complete"
            );
            Ok(record)
        }

        pub async fn render(&self, params: RenderParams) -> Result<Option<EventRecord>> {
            self.render_sync(params)
        }

        fn assemble(&self, params: RenderParams) -> Result<(BridgeRequest, Subscriptions)> {
            let RenderParams {
                elements,
                layout,
                node_styles,
                edge_styles,
                height_px,
                events,
            } = params;

            let style = build_style(&node_styles, &edge_styles)?;
            let layout = self.layouts.resolve(&layout)?;
            let subscriptions = build_subscriptions(events)?;
            let config = bridge::encode(elements, style, layout, height_px, &subscriptions)?;
            let request = BridgeRequest {
                config,
                key: self.key.clone(),
            };
            Ok((request, subscriptions))
        }
    }
}
