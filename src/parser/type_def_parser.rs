//! CREATE TYPE and CREATE DOMAIN parsing
//!
//! ## Supported Syntax
//!
//! ```sql
//! CREATE [OR REPLACE] TYPE [schema.]name AS ENUM ('a', 'b')
//! CREATE TYPE name AS OBJECT (attr TYPE, …)
//! CREATE TYPE name AS TABLE (col TYPE …, …)
//! CREATE TYPE name AS (col TYPE, …)
//! CREATE TYPE name (INPUT = in_fn, OUTPUT = out_fn)
//!
//! CREATE DOMAIN [schema.]name [AS] ENUM ('a', 'b')
//! CREATE DOMAIN [schema.]name [AS] type [NOT NULL | NULL] [DEFAULT v]
//!     [COLLATE c] [[CONSTRAINT name] CHECK (expr) …]
//! ```

use super::ast::{ColumnFragment, DomainDecl, Statement, TypeBody, TypeDecl};
use super::column_parser::parse_column_definition;
use super::constraint_parser::{parse_check, parse_constraint_name, parse_default};
use super::grammar::{is_create_of, Grammar};
use super::token_parser_base::{ParseResult, TokenParser};
use super::tokens::tokens_to_text;
use super::type_parser::require_type;

pub fn register(grammar: &mut Grammar) {
    grammar.register(
        "create_type",
        |base| is_create_of(base, "TYPE"),
        reduce_create_type,
    );
    grammar.register(
        "create_domain",
        |base| is_create_of(base, "DOMAIN"),
        reduce_create_domain,
    );
}

fn reduce_create_type(base: &mut TokenParser) -> ParseResult<Statement> {
    base.require_word_ci("CREATE")?;
    let replace = base.expect_words_ci(&["OR", "REPLACE"]);
    base.require_word_ci("TYPE")?;
    let (schema, type_name) = base.require_schema_qualified_name()?;

    let body = if base.expect_word_ci("AS") {
        if base.expect_word_ci("ENUM") {
            TypeBody::Enum(base.require_name_list()?)
        } else if base.expect_word_ci("OBJECT") {
            TypeBody::Object(parse_attribute_list(base)?)
        } else if base.expect_word_ci("TABLE") {
            TypeBody::Table(parse_attribute_list(base)?)
        } else {
            TypeBody::Composite(parse_attribute_list(base)?)
        }
    } else {
        TypeBody::Properties(parse_type_properties(base)?)
    };

    Ok(Statement::Type(TypeDecl {
        schema,
        type_name,
        replace,
        body,
    }))
}

/// `(name TYPE …, …)`
fn parse_attribute_list(base: &mut TokenParser) -> ParseResult<Vec<ColumnFragment>> {
    base.require_punct("(")?;
    let mut attributes = Vec::new();
    loop {
        if base.expect_punct(")") {
            return Ok(attributes);
        }
        attributes.push(parse_column_definition(base)?);
        if !base.expect_punct(",") {
            base.require_punct(")")?;
            return Ok(attributes);
        }
    }
}

/// `(KEY = value, …)` for base types
fn parse_type_properties(base: &mut TokenParser) -> ParseResult<Vec<(String, String)>> {
    let inner = base.require_parenthesized()?;
    let mut properties = Vec::new();
    for part in inner.split(|t| t.is_punct(",")).filter(|p| !p.is_empty()) {
        match part {
            [key, eq, value @ ..] if eq.is_punct("=") && !value.is_empty() => {
                properties.push((key.text.clone(), tokens_to_text(value)));
            }
            _ => return Err(base.error("expected type property 'name = value'")),
        }
    }
    Ok(properties)
}

fn reduce_create_domain(base: &mut TokenParser) -> ParseResult<Statement> {
    base.require_word_ci("CREATE")?;
    base.require_word_ci("DOMAIN")?;
    let (schema, domain_name) = base.require_schema_qualified_name()?;
    base.expect_word_ci("AS");

    let mut decl = DomainDecl {
        schema,
        domain_name,
        ..DomainDecl::default()
    };

    if base.expect_word_ci("ENUM") {
        decl.base_type = "ENUM".to_string();
        decl.values = Some(base.require_name_list()?);
    } else {
        let data_type = require_type(base)?;
        decl.base_type = data_type.text;
        decl.size = data_type.size;
    }

    loop {
        if base.expect_words_ci(&["NOT", "NULL"]) {
            decl.nullable = Some(false);
        } else if base.expect_word_ci("NULL") {
            decl.nullable = Some(true);
        } else if base.check_word_ci("DEFAULT") {
            decl.default = Some(parse_default(base)?);
        } else if base.expect_word_ci("COLLATE") {
            decl.collate = Some(base.require_identifier()?);
        } else if base.check_any_word_ci(&["CONSTRAINT", "CHECK"]) {
            parse_constraint_name(base)?;
            decl.check.extend(parse_check(base)?);
        } else {
            break;
        }
    }

    Ok(Statement::Domain(decl))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::{DefaultValue, Size};
    use crate::parser::tokens::tokenize;

    fn reduce(sql: &str, reducer: fn(&mut TokenParser) -> ParseResult<Statement>) -> Statement {
        let mut base = TokenParser::new(tokenize(sql).unwrap());
        let statement = reducer(&mut base).unwrap();
        assert!(base.is_at_end(), "unconsumed input in {}", sql);
        statement
    }

    fn type_decl(sql: &str) -> TypeDecl {
        match reduce(sql, reduce_create_type) {
            Statement::Type(decl) => decl,
            other => panic!("expected type, got {:?}", other),
        }
    }

    fn domain(sql: &str) -> DomainDecl {
        match reduce(sql, reduce_create_domain) {
            Statement::Domain(decl) => decl,
            other => panic!("expected domain, got {:?}", other),
        }
    }

    #[test]
    fn test_enum_type() {
        let decl = type_decl("CREATE TYPE public.mood AS ENUM ('sad', 'ok', 'happy')");
        assert_eq!(decl.schema.as_deref(), Some("public"));
        assert_eq!(decl.type_name, "mood");
        assert_eq!(
            decl.body,
            TypeBody::Enum(vec![
                "'sad'".to_string(),
                "'ok'".to_string(),
                "'happy'".to_string()
            ])
        );
    }

    #[test]
    fn test_object_type() {
        let decl = type_decl("CREATE OR REPLACE TYPE addr AS OBJECT (street VARCHAR2(30), zip NUMBER)");
        assert!(decl.replace);
        let TypeBody::Object(attributes) = decl.body else {
            panic!("expected object");
        };
        assert_eq!(attributes.len(), 2);
        assert_eq!(attributes[0].data_type.size, Some(Size::Int(30)));
    }

    #[test]
    fn test_table_type() {
        let decl = type_decl("CREATE TYPE [dbo].[IdList] AS TABLE ([Id] INT NOT NULL)");
        let TypeBody::Table(columns) = decl.body else {
            panic!("expected table");
        };
        assert!(!columns[0].nullable);
    }

    #[test]
    fn test_base_type_properties() {
        let decl = type_decl("CREATE TYPE box (INTERNALLENGTH = 16, INPUT = my_box_in_function)");
        assert_eq!(
            decl.body,
            TypeBody::Properties(vec![
                ("INTERNALLENGTH".to_string(), "16".to_string()),
                ("INPUT".to_string(), "my_box_in_function".to_string()),
            ])
        );
    }

    #[test]
    fn test_enum_domain() {
        let decl = domain("CREATE DOMAIN color AS ENUM ('red', 'green')");
        assert_eq!(decl.base_type, "ENUM");
        assert_eq!(decl.values.unwrap().len(), 2);
    }

    #[test]
    fn test_domain_with_constraints() {
        let decl = domain(
            "CREATE DOMAIN us_postal_code AS VARCHAR(10) NOT NULL DEFAULT '00000' \
             CONSTRAINT chk CHECK (VALUE <> '')",
        );
        assert_eq!(decl.base_type, "VARCHAR");
        assert_eq!(decl.size, Some(Size::Int(10)));
        assert_eq!(decl.nullable, Some(false));
        assert_eq!(decl.default, Some(DefaultValue::Text("'00000'".to_string())));
        assert_eq!(decl.check.join(" "), "VALUE <> ''");
    }
}
