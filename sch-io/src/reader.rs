//! 行记录分词。每条记录以类型标记开头，字段以空白分隔；
//! 多行记录（路径、文本）的续行由对应的工厂直接从读取器中取出。

use std::str::Lines;

use sch_core::style::{CapType, DashType, FillStyle, FillType, LineStyle};

use crate::ParseError;

/// 一条记录的首行。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<'a> {
    pub line: usize,
    pub token: &'a str,
    pub fields: Vec<&'a str>,
}

impl<'a> Record<'a> {
    pub fn cursor(&self) -> FieldCursor<'_, 'a> {
        FieldCursor {
            record: self,
            position: 0,
        }
    }
}

pub struct RecordReader<'a> {
    lines: Lines<'a>,
    line_number: usize,
}

impl<'a> RecordReader<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lines: source.lines(),
            line_number: 0,
        }
    }

    #[inline]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// 读取下一条记录，跳过空行。
    pub fn next_record(&mut self) -> Option<Record<'a>> {
        loop {
            let (line, raw) = self.next_line()?;
            let mut parts = raw.split_whitespace();
            let Some(token) = parts.next() else {
                continue;
            };
            return Some(Record {
                line,
                token,
                fields: parts.collect(),
            });
        }
    }

    /// 原样读取一行续行（去掉行尾 `\r`），空行同样计入。
    pub fn next_line(&mut self) -> Option<(usize, &'a str)> {
        let raw = self.lines.next()?;
        self.line_number += 1;
        Some((self.line_number, raw.trim_end_matches('\r')))
    }

    /// 读取 `count` 行续行；文件提前结束时报告截断，并退回到记录首行之后，
    /// 被误当作续行的后续记录仍可继续读取。
    pub fn take_lines(
        &mut self,
        record: &Record<'_>,
        count: usize,
    ) -> Result<Vec<(usize, &'a str)>, ParseError> {
        let checkpoint = (self.lines.clone(), self.line_number);
        let mut lines = Vec::new();
        for found in 0..count {
            match self.next_line() {
                Some(line) => lines.push(line),
                None => {
                    (self.lines, self.line_number) = checkpoint;
                    return Err(ParseError::Truncated {
                        line: record.line,
                        token: record.token.to_string(),
                        expected: count,
                        found,
                    });
                }
            }
        }
        Ok(lines)
    }
}

/// 按顺序消费记录字段。
pub struct FieldCursor<'r, 'a> {
    record: &'r Record<'a>,
    position: usize,
}

impl FieldCursor<'_, '_> {
    #[inline]
    pub fn remaining(&self) -> usize {
        self.record.fields.len().saturating_sub(self.position)
    }

    pub fn next_i32(&mut self, field: &'static str) -> Result<i32, ParseError> {
        let raw = self
            .record
            .fields
            .get(self.position)
            .ok_or_else(|| ParseError::MissingField {
                line: self.record.line,
                token: self.record.token.to_string(),
                field,
            })?;
        self.position += 1;
        parse_i32(raw, self.record.line, field)
    }

    pub fn next_u32(&mut self, field: &'static str) -> Result<u32, ParseError> {
        let value = self.next_i32(field)?;
        u32::try_from(value).map_err(|_| ParseError::MalformedField {
            line: self.record.line,
            field,
            value: value.to_string(),
        })
    }

    pub fn next_count(&mut self, field: &'static str) -> Result<usize, ParseError> {
        let value = self.next_u32(field)?;
        usize::try_from(value).map_err(|_| ParseError::MalformedField {
            line: self.record.line,
            field,
            value: value.to_string(),
        })
    }

    pub fn next_bool(&mut self, field: &'static str) -> Result<bool, ParseError> {
        match self.next_i32(field)? {
            0 => Ok(false),
            1 => Ok(true),
            code => Err(ParseError::BadCode {
                line: self.record.line,
                field,
                code,
            }),
        }
    }

    /// 非负整数（半径等）。
    pub fn next_non_negative(&mut self, field: &'static str) -> Result<i32, ParseError> {
        let value = self.next_i32(field)?;
        if value < 0 {
            return Err(ParseError::MalformedField {
                line: self.record.line,
                field,
                value: value.to_string(),
            });
        }
        Ok(value)
    }

    pub fn next_code<T>(
        &mut self,
        field: &'static str,
        from_code: impl FnOnce(i32) -> Option<T>,
    ) -> Result<T, ParseError> {
        let code = self.next_i32(field)?;
        from_code(code).ok_or(ParseError::BadCode {
            line: self.record.line,
            field,
            code,
        })
    }

    /// 可选的线型块：要么整块缺省，要么五个字段齐全。
    ///
    /// `reserved` 为线型块之后仍需保留给其他字段的数量。
    pub fn optional_line_style(&mut self, reserved: usize) -> Result<LineStyle, ParseError> {
        match self.remaining().checked_sub(reserved) {
            Some(0) | None => Ok(LineStyle::default()),
            Some(available) if available >= LINE_STYLE_FIELDS => self.line_style(),
            Some(available) => Err(self.partial_block("line style", available)),
        }
    }

    /// 可选的填充块：要么整块缺省，要么六个字段齐全。
    pub fn optional_fill_style(&mut self, reserved: usize) -> Result<FillStyle, ParseError> {
        match self.remaining().checked_sub(reserved) {
            Some(0) | None => Ok(FillStyle::default()),
            Some(available) if available >= FILL_STYLE_FIELDS => self.fill_style(),
            Some(available) => Err(self.partial_block("fill style", available)),
        }
    }

    /// 记录必须恰好在此处结束。
    pub fn finish(&self) -> Result<(), ParseError> {
        match self.remaining() {
            0 => Ok(()),
            extra => Err(ParseError::TrailingFields {
                line: self.record.line,
                token: self.record.token.to_string(),
                extra,
            }),
        }
    }

    fn line_style(&mut self) -> Result<LineStyle, ParseError> {
        Ok(LineStyle {
            width: self.next_i32("line width")?,
            cap_type: self.next_code("cap style", CapType::from_code)?,
            dash_type: self.next_code("dash style", DashType::from_code)?,
            dash_length: self.next_i32("dash length")?,
            dash_space: self.next_i32("dash space")?,
        })
    }

    fn fill_style(&mut self) -> Result<FillStyle, ParseError> {
        Ok(FillStyle {
            fill_type: self.next_code("fill type", FillType::from_code)?,
            width: self.next_i32("fill width")?,
            angle1: self.next_i32("fill angle 1")?,
            pitch1: self.next_i32("fill pitch 1")?,
            angle2: self.next_i32("fill angle 2")?,
            pitch2: self.next_i32("fill pitch 2")?,
        })
    }

    fn partial_block(&self, block: &'static str, available: usize) -> ParseError {
        ParseError::PartialBlock {
            line: self.record.line,
            token: self.record.token.to_string(),
            block,
            found: available,
        }
    }
}

pub const LINE_STYLE_FIELDS: usize = 5;
pub const FILL_STYLE_FIELDS: usize = 6;

pub(crate) fn parse_i32(raw: &str, line: usize, field: &'static str) -> Result<i32, ParseError> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| ParseError::MalformedField {
            line,
            field,
            value: raw.to_string(),
        })
}
