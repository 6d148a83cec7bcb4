//! 路径数据：`M x,y`、`L x,y`、`m dx,dy`、`l dx,dy` 与 `z`，一行可写多条命令。
//!
//! 写出端每行一条命令；读取端按记号切分整行，命令字母后可跟多组坐标，
//! `M`/`m` 之后的额外坐标视为对应的直线命令。

use sch_core::path::PathCommand;

use crate::ParseError;
use crate::reader::parse_i32;

pub fn format_command(command: &PathCommand) -> String {
    match command {
        PathCommand::AbsoluteMoveTo { point } => format!("M {},{}", point.x(), point.y()),
        PathCommand::AbsoluteLineTo { point } => format!("L {},{}", point.x(), point.y()),
        PathCommand::RelativeMoveTo { offset } => format!("m {},{}", offset.x(), offset.y()),
        PathCommand::RelativeLineTo { offset } => format!("l {},{}", offset.x(), offset.y()),
        PathCommand::ClosePath => "z".to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Command(char),
    Number(&'a str),
}

/// 逗号与空白只作分隔；符号总是开始一个新数字，`10-20` 为两个数。
fn tokenize(raw: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = raw;
    while let Some(c) = rest.chars().next() {
        if c == ',' || c.is_whitespace() {
            rest = &rest[c.len_utf8()..];
        } else if c.is_ascii_digit() || c == '-' || c == '+' {
            let end = rest[1..]
                .find(|c: char| !c.is_ascii_digit())
                .map_or(rest.len(), |index| index + 1);
            tokens.push(Token::Number(&rest[..end]));
            rest = &rest[end..];
        } else {
            tokens.push(Token::Command(c));
            rest = &rest[c.len_utf8()..];
        }
    }
    tokens
}

fn operand_field(letter: char) -> &'static str {
    match letter {
        'M' => "move-to point",
        'L' => "line-to point",
        'm' => "move-to offset",
        _ => "line-to offset",
    }
}

fn coordinate_command(letter: char, repeated: bool, x: i32, y: i32) -> PathCommand {
    match (letter, repeated) {
        ('M', false) => PathCommand::absolute_move_to(x, y),
        ('M', true) | ('L', _) => PathCommand::absolute_line_to(x, y),
        ('m', false) => PathCommand::relative_move_to(x, y),
        _ => PathCommand::relative_line_to(x, y),
    }
}

/// 解析一行路径数据，返回其中的全部命令；空行不含命令。
pub fn parse_line(raw: &str, line: usize) -> Result<Vec<PathCommand>, ParseError> {
    let malformed = |field: &'static str| ParseError::MalformedField {
        line,
        field,
        value: raw.to_string(),
    };

    let mut tokens = tokenize(raw).into_iter().peekable();
    let mut commands = Vec::new();
    while let Some(token) = tokens.next() {
        let Token::Command(letter) = token else {
            return Err(malformed("path command"));
        };
        match letter {
            'z' | 'Z' => commands.push(PathCommand::ClosePath),
            'M' | 'L' | 'm' | 'l' => {
                let field = operand_field(letter);
                let mut pairs = 0;
                while let Some(&Token::Number(x)) = tokens.peek() {
                    tokens.next();
                    let Some(Token::Number(y)) = tokens.next() else {
                        return Err(malformed(field));
                    };
                    let (x, y) = (parse_i32(x, line, field)?, parse_i32(y, line, field)?);
                    commands.push(coordinate_command(letter, pairs > 0, x, y));
                    pairs += 1;
                }
                if pairs == 0 {
                    return Err(malformed(field));
                }
            }
            _ => return Err(malformed("path command")),
        }
    }
    Ok(commands)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_compact_and_spaced_operands() {
        assert_eq!(
            parse_line("M100,200", 1).unwrap(),
            vec![PathCommand::absolute_move_to(100, 200)]
        );
        assert_eq!(
            parse_line("  l -5, 7 ", 1).unwrap(),
            vec![PathCommand::relative_line_to(-5, 7)]
        );
        assert_eq!(
            parse_line("m 3 4", 1).unwrap(),
            vec![PathCommand::relative_move_to(3, 4)]
        );
        assert_eq!(parse_line("Z", 1).unwrap(), vec![PathCommand::ClosePath]);
        assert!(parse_line("   ", 1).unwrap().is_empty());
    }

    #[test]
    fn one_line_may_hold_several_commands() {
        assert_eq!(
            parse_line("M 0,0 L 100,0 l0-50z", 3).unwrap(),
            vec![
                PathCommand::absolute_move_to(0, 0),
                PathCommand::absolute_line_to(100, 0),
                PathCommand::relative_line_to(0, -50),
                PathCommand::ClosePath,
            ]
        );
        assert_eq!(
            parse_line("m 10,10 5,0 0,5", 3).unwrap(),
            vec![
                PathCommand::relative_move_to(10, 10),
                PathCommand::relative_line_to(5, 0),
                PathCommand::relative_line_to(0, 5),
            ]
        );
    }

    #[test]
    fn writer_output_is_canonical() {
        assert_eq!(
            format_command(&PathCommand::absolute_line_to(-1, 2)),
            "L -1,2"
        );
        assert_eq!(format_command(&PathCommand::relative_move_to(0, -9)), "m 0,-9");
        assert_eq!(format_command(&PathCommand::ClosePath), "z");
    }

    #[test]
    fn rejects_unknown_letters_and_bad_operands() {
        assert!(parse_line("C 1,2 3,4 5,6", 8).is_err());
        assert!(parse_line("L 1", 8).is_err());
        assert!(parse_line("z 1,1", 8).is_err());
        assert!(parse_line("M 0,0 L", 8).is_err());
        let err = parse_line("12,4", 9).unwrap_err();
        assert_eq!(err.line(), 9);
    }
}
