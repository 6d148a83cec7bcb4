use std::collections::HashMap;

use sch_core::item::GraphicItem;

use crate::ParseError;
use crate::factories::{
    ArcFactory, BoxFactory, CircleFactory, LineFactory, PathFactory, PinFactory, TextFactory,
};
use crate::reader::{Record, RecordReader};

/// 由一条记录（及其续行）构造一个图元。
pub trait ItemFactory: Send + Sync {
    fn create(
        &self,
        record: &Record<'_>,
        reader: &mut RecordReader<'_>,
    ) -> Result<GraphicItem, ParseError>;
}

/// 记录类型标记到工厂的映射。
#[derive(Default)]
pub struct FactoryRegistry {
    factories: HashMap<String, Box<dyn ItemFactory>>,
}

impl FactoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册 L、B、V、A、H、P、T 七种图形记录。
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(LineFactory::TOKEN, LineFactory);
        registry.register(BoxFactory::TOKEN, BoxFactory);
        registry.register(CircleFactory::TOKEN, CircleFactory);
        registry.register(ArcFactory::TOKEN, ArcFactory);
        registry.register(PathFactory::TOKEN, PathFactory);
        registry.register(PinFactory::TOKEN, PinFactory);
        registry.register(TextFactory::TOKEN, TextFactory);
        registry
    }

    /// 注册工厂，返回被替换的旧工厂。
    pub fn register<F>(&mut self, token: impl Into<String>, factory: F) -> Option<Box<dyn ItemFactory>>
    where
        F: ItemFactory + 'static,
    {
        self.factories.insert(token.into(), Box::new(factory))
    }

    #[inline]
    pub fn contains(&self, token: &str) -> bool {
        self.factories.contains_key(token)
    }

    pub fn dispatch(
        &self,
        record: &Record<'_>,
        reader: &mut RecordReader<'_>,
    ) -> Result<GraphicItem, ParseError> {
        let factory = self
            .factories
            .get(record.token)
            .ok_or_else(|| ParseError::UnknownToken {
                line: record.line,
                token: record.token.to_string(),
            })?;
        factory.create(record, reader)
    }

    /// 已注册的标记，按字典序排列。
    pub fn tokens(&self) -> Vec<&str> {
        let mut tokens: Vec<_> = self.factories.keys().map(String::as_str).collect();
        tokens.sort_unstable();
        tokens
    }
}

impl std::fmt::Debug for FactoryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactoryRegistry")
            .field("tokens", &self.tokens())
            .finish()
    }
}
