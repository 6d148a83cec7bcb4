use std::collections::HashMap;

use tracing::debug;

use crate::document::SchematicDocument;

#[derive(Debug, Clone)]
pub struct CommandRequest {
    pub name: String,
    pub args: Vec<String>,
}

impl CommandRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone)]
pub struct CommandResponse {
    pub success: bool,
    pub message: Option<String>,
}

impl CommandResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

pub trait CommandHandler: Send + Sync {
    fn name(&self) -> &'static str;
    fn execute(
        &self,
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse;
}

pub struct CommandContext<'a> {
    pub document: &'a mut SchematicDocument,
}

pub struct CommandBus {
    handlers: HashMap<&'static str, Box<dyn CommandHandler>>,
}

impl CommandBus {
    pub fn new() -> Self {
        let mut bus = Self {
            handlers: HashMap::new(),
        };
        bus.register(SelectAllCommand);
        bus.register(ClearSelectionCommand);
        bus.register(DeleteSelectionCommand);
        bus.register(TranslateSelectionCommand);
        bus
    }

    pub fn register<H: CommandHandler + 'static>(&mut self, handler: H) {
        self.handlers.insert(handler.name(), Box::new(handler));
    }

    pub fn dispatch(
        &self,
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        if let Some(handler) = self.handlers.get(request.name.as_str()) {
            debug!(command = request.name.as_str(), "执行命令");
            handler.execute(request, context)
        } else {
            CommandResponse::err(format!("未知命令: {}", request.name))
        }
    }

    /// 已注册命令名，按字典序排列。
    pub fn available_commands(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for CommandBus {
    fn default() -> Self {
        Self::new()
    }
}

struct SelectAllCommand;

impl CommandHandler for SelectAllCommand {
    fn name(&self) -> &'static str {
        "select_all"
    }

    fn execute(
        &self,
        _request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        let count = context.document.select_all();
        CommandResponse::ok(format!("已选中 {count} 个图元"))
    }
}

struct ClearSelectionCommand;

impl CommandHandler for ClearSelectionCommand {
    fn name(&self) -> &'static str {
        "clear_selection"
    }

    fn execute(
        &self,
        _request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        context.document.clear_selection();
        CommandResponse::ok("选中集已清空")
    }
}

struct DeleteSelectionCommand;

impl CommandHandler for DeleteSelectionCommand {
    fn name(&self) -> &'static str {
        "delete_selection"
    }

    fn execute(
        &self,
        _request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        if context.document.selection_len() == 0 {
            return CommandResponse::err("当前没有选中图元");
        }
        let removed = context.document.delete_selection();
        CommandResponse::ok(format!("已删除 {removed} 个图元"))
    }
}

/// `translate_selection <dx> <dy>`
struct TranslateSelectionCommand;

impl CommandHandler for TranslateSelectionCommand {
    fn name(&self) -> &'static str {
        "translate_selection"
    }

    fn execute(
        &self,
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        let [dx, dy] = request.args.as_slice() else {
            return CommandResponse::err("用法: translate_selection <dx> <dy>");
        };
        let (Ok(dx), Ok(dy)) = (dx.parse::<i32>(), dy.parse::<i32>()) else {
            return CommandResponse::err(format!("无效的位移参数: {dx} {dy}"));
        };
        if context.document.selection_len() == 0 {
            return CommandResponse::err("当前没有选中图元");
        }
        let moved = context.document.translate_selection(dx, dy);
        CommandResponse::ok(format!("已平移 {moved} 个图元"))
    }
}
