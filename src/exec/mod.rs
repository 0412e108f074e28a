//! The tree-walking evaluator: executes a parsed [`Program`] statement by
//! statement over an [`Environment`] chain, propagating abrupt completions
//! (`break`/`continue`/`return`/`throw`) as the `Err` arm of every result.
//!
//! One match arm per node kind, taking `&mut Context` explicitly rather than
//! a method on the AST node, since the AST here is plain data with no
//! behavior of its own.

use std::rc::Rc;

use crate::context::Context;
use crate::environment::{Environment, Reference};
use crate::heap::ObjectHandle;
use crate::object::{ArgumentsMap, Callable, Class, Object, ObjectKind, PropertyDescriptor, ValueResult};
use crate::syntax::ast::*;
use crate::value::{Hint, Value};

/// An abrupt completion (ES5 §8.9): every statement/expression evaluator in
/// this module returns `Result<Value, Completion>`, matching
/// [`crate::object::ValueResult`] so native functions and the tree-walker
/// share one error type.
#[derive(Debug, Clone)]
pub enum Completion {
    Throw(Value),
    Return(Value),
    Break(Option<Rc<str>>),
    Continue(Option<Rc<str>>),
}

type StmtResult = Result<Value, Completion>;

/// Hoists `var` and function declarations to the top of their enclosing
/// scope (ES5 §10.5): runs once before the first statement executes,
/// walking the statement tree without evaluating anything. Function
/// declarations are fully instantiated (so forward calls work); `var`
/// names are only given an `undefined` binding if they don't already have
/// one, so re-entering the same scope (e.g. a loop body with a `var`
/// inside) doesn't clobber an existing value.
pub fn hoist_declarations(ctx: &mut Context<'_>, body: &[Statement], env: &Environment, strict: bool) {
    for stmt in body {
        collect_var_names(stmt, &mut |name| {
            env.create_mutable_binding(ctx.heap_mut(), name, false);
        });
    }
    for stmt in body {
        if let Statement::FunctionDeclaration { name, params, body: fn_body } = stmt {
            let func = instantiate_function(ctx, Some(name.clone()), params.clone(), fn_body.clone(), env.clone(), strict || fn_body.strict);
            env.create_mutable_binding(ctx.heap_mut(), name, false);
            let _ = env.set_mutable_binding(ctx.heap_mut(), name, Value::Object(func), false);
        }
    }
}

fn collect_var_names(stmt: &Statement, sink: &mut impl FnMut(&Rc<str>)) {
    match stmt {
        Statement::Var(decls) => {
            for (name, _) in decls {
                sink(name);
            }
        }
        Statement::Block(body) => body.iter().for_each(|s| collect_var_names(s, sink)),
        Statement::If { consequent, alternate, .. } => {
            collect_var_names(consequent, sink);
            if let Some(a) = alternate {
                collect_var_names(a, sink);
            }
        }
        Statement::DoWhile { body, .. } | Statement::While { body, .. } | Statement::With { body, .. } => {
            collect_var_names(body, sink)
        }
        Statement::For { init, body, .. } => {
            if let Some(init) = init {
                if let ForInit::VarDecl(decls) = init.as_ref() {
                    for (name, _) in decls {
                        sink(name);
                    }
                }
            }
            collect_var_names(body, sink);
        }
        Statement::ForIn { decl, body, .. } => {
            if let ForInTarget::Var(name) = decl {
                sink(name);
            }
            collect_var_names(body, sink);
        }
        Statement::Switch { cases, .. } => {
            for case in cases {
                case.body.iter().for_each(|s| collect_var_names(s, sink));
            }
        }
        Statement::Labelled { body, .. } => collect_var_names(body, sink),
        Statement::Try { block, handler, finalizer } => {
            block.iter().for_each(|s| collect_var_names(s, sink));
            if let Some((_, catch_body)) = handler {
                catch_body.iter().for_each(|s| collect_var_names(s, sink));
            }
            if let Some(f) = finalizer {
                f.iter().for_each(|s| collect_var_names(s, sink));
            }
        }
        _ => {}
    }
}

fn instantiate_function(
    ctx: &mut Context<'_>,
    name: Option<Rc<str>>,
    params: Vec<Param>,
    body: FunctionBody,
    scope: Environment,
    strict: bool,
) -> ObjectHandle {
    let proto_obj = Object::new(Class::Object, Some(ctx.object_prototype()));
    let prototype = ctx.heap_mut().allocate_object(proto_obj);
    let func_proto = ctx.function_prototype();
    let mut obj = Object::new(Class::Function, Some(func_proto));
    let param_count = params.len();
    obj.kind.callable = Some(Callable::Ordinary { params, body, scope, strict, name: name.clone() });
    obj.kind.is_constructor = true;
    let handle = ctx.heap_mut().allocate_object(obj);
    let target = ctx.heap_mut().object_mut(handle);
    target.set_own_property("length", PropertyDescriptor::data(Value::Number(param_count as f64), false, false, false));
    let name_value = ctx.new_string(name.as_deref().unwrap_or("").to_string());
    ctx.heap_mut()
        .object_mut(handle)
        .set_own_property("name", PropertyDescriptor::data(name_value, false, false, false));
    ctx.heap_mut()
        .object_mut(handle)
        .set_own_property("prototype", PropertyDescriptor::data(Value::Object(prototype), true, false, false));
    ctx.heap_mut()
        .object_mut(prototype)
        .set_own_property("constructor", PropertyDescriptor::data(Value::Object(handle), true, false, true));
    handle
}

/// Executes a statement list, returning the completion value of the last
/// expression statement executed (used by `eval`'s return value — ES5's
/// "empty completion keeps the previous value" rule, approximated here by
/// threading the last non-empty value through rather than modeling
/// `Completion.value` as `Option` end to end).
pub fn execute_statements(ctx: &mut Context<'_>, body: &[Statement], env: &Environment, this: Value, strict: bool) -> StmtResult {
    let mut last = Value::Undefined;
    for stmt in body {
        last = execute_statement(ctx, stmt, env, this, strict)?;
    }
    Ok(last)
}

fn execute_statement(ctx: &mut Context<'_>, stmt: &Statement, env: &Environment, this: Value, strict: bool) -> StmtResult {
    execute_statement_labelled(ctx, stmt, env, this, strict, None)
}

/// `own_label` is the label, if any, immediately attached to this statement
/// by an enclosing [`Statement::Labelled`] — loop statements absorb a
/// `continue`/`break` carrying that label instead of propagating it (ES5
/// §12.7's label set applies to the iteration statement itself, not just
/// the labelled wrapper).
fn execute_statement_labelled(
    ctx: &mut Context<'_>,
    stmt: &Statement,
    env: &Environment,
    this: Value,
    strict: bool,
    own_label: Option<&Rc<str>>,
) -> StmtResult {
    let matches_own = |l: &Option<Rc<str>>| match (l, own_label) {
        (None, _) => true,
        (Some(l), Some(own)) => l == own,
        (Some(_), None) => false,
    };
    match stmt {
        Statement::Empty | Statement::Debugger | Statement::FunctionDeclaration { .. } => Ok(Value::Undefined),
        Statement::Block(body) => execute_statements(ctx, body, env, this, strict),
        Statement::Var(decls) => {
            for (name, init) in decls {
                if let Some(init) = init {
                    let value = evaluate_expression(ctx, init, env, this, strict)?;
                    set_identifier(ctx, env, name, value, strict)?;
                }
            }
            Ok(Value::Undefined)
        }
        Statement::Expression(expr) => evaluate_expression(ctx, expr, env, this, strict),
        Statement::If { test, consequent, alternate } => {
            if evaluate_expression(ctx, test, env, this, strict)?.to_boolean(ctx.heap()) {
                execute_statement(ctx, consequent, env, this, strict)
            } else if let Some(alt) = alternate {
                execute_statement(ctx, alt, env, this, strict)
            } else {
                Ok(Value::Undefined)
            }
        }
        Statement::DoWhile { body, test } => {
            let mut last = Value::Undefined;
            loop {
                match execute_statement(ctx, body, env, this, strict) {
                    Ok(v) => last = v,
                    Err(Completion::Break(l)) if matches_own(&l) => break,
                    Err(Completion::Continue(l)) if matches_own(&l) => {}
                    Err(other) => return Err(other),
                }
                if !evaluate_expression(ctx, test, env, this, strict)?.to_boolean(ctx.heap()) {
                    break;
                }
            }
            Ok(last)
        }
        Statement::While { test, body } => {
            let mut last = Value::Undefined;
            while evaluate_expression(ctx, test, env, this, strict)?.to_boolean(ctx.heap()) {
                match execute_statement(ctx, body, env, this, strict) {
                    Ok(v) => last = v,
                    Err(Completion::Break(l)) if matches_own(&l) => break,
                    Err(Completion::Continue(l)) if matches_own(&l) => continue,
                    Err(other) => return Err(other),
                }
            }
            Ok(last)
        }
        Statement::For { init, test, update, body } => {
            match init.as_deref() {
                Some(ForInit::Expression(expr)) => {
                    evaluate_expression(ctx, expr, env, this, strict)?;
                }
                Some(ForInit::VarDecl(decls)) => {
                    for (name, init) in decls {
                        let value = match init {
                            Some(e) => evaluate_expression(ctx, e, env, this, strict)?,
                            None => Value::Undefined,
                        };
                        set_identifier(ctx, env, name, value, strict)?;
                    }
                }
                None => {}
            }
            let mut last = Value::Undefined;
            loop {
                if let Some(test) = test {
                    if !evaluate_expression(ctx, test, env, this, strict)?.to_boolean(ctx.heap()) {
                        break;
                    }
                }
                match execute_statement(ctx, body, env, this, strict) {
                    Ok(v) => last = v,
                    Err(Completion::Break(l)) if matches_own(&l) => break,
                    Err(Completion::Continue(l)) if matches_own(&l) => {}
                    Err(other) => return Err(other),
                }
                if let Some(update) = update {
                    evaluate_expression(ctx, update, env, this, strict)?;
                }
            }
            Ok(last)
        }
        Statement::ForIn { decl, object, body } => {
            let obj_value = evaluate_expression(ctx, object, env, this, strict)?;
            if obj_value.is_nullish() {
                return Ok(Value::Undefined);
            }
            let obj = ctx.to_object(obj_value)?;
            let keys = enumerable_keys_including_prototypes(ctx, obj);
            let mut last = Value::Undefined;
            for key in keys {
                if !ctx.has_property(obj, &key) {
                    continue;
                }
                let key_value = ctx.new_string(key.clone());
                match decl {
                    ForInTarget::Var(name) => set_identifier(ctx, env, name, key_value, strict)?,
                    ForInTarget::Pattern(target) => assign_to_target(ctx, target, key_value, env, this, strict)?,
                }
                match execute_statement(ctx, body, env, this, strict) {
                    Ok(v) => last = v,
                    Err(Completion::Break(l)) if matches_own(&l) => break,
                    Err(Completion::Continue(l)) if matches_own(&l) => continue,
                    Err(other) => return Err(other),
                }
            }
            Ok(last)
        }
        Statement::Continue(label) => Err(Completion::Continue(label.clone())),
        Statement::Break(label) => Err(Completion::Break(label.clone())),
        Statement::Return(value) => {
            let v = match value {
                Some(e) => evaluate_expression(ctx, e, env, this, strict)?,
                None => Value::Undefined,
            };
            Err(Completion::Return(v))
        }
        Statement::With { object, body } => {
            let obj_value = evaluate_expression(ctx, object, env, this, strict)?;
            let obj = ctx.to_object(obj_value)?;
            let with_env = Environment::new_object(obj, true, Some(env.clone()));
            execute_statement(ctx, body, &with_env, this, strict)
        }
        Statement::Switch { discriminant, cases } => execute_switch(ctx, discriminant, cases, env, this, strict),
        Statement::Labelled { label, body } => match execute_statement_labelled(ctx, body, env, this, strict, Some(label)) {
            Err(Completion::Break(Some(l))) if l == *label => Ok(Value::Undefined),
            Err(Completion::Continue(Some(l))) if l == *label => Ok(Value::Undefined),
            other => other,
        },
        Statement::Throw(expr) => {
            let v = evaluate_expression(ctx, expr, env, this, strict)?;
            Err(Completion::Throw(v))
        }
        Statement::Try { block, handler, finalizer } => {
            let result = execute_statements(ctx, block, env, this, strict);
            let result = match result {
                Err(Completion::Throw(value)) => {
                    if let Some((param, catch_body)) = handler {
                        let catch_env = Environment::new_declarative(Some(env.clone()));
                        if let Some(param) = param {
                            catch_env.create_immutable_binding(param.clone());
                            catch_env.initialize_immutable_binding(param, value);
                        }
                        execute_statements(ctx, catch_body, &catch_env, this, strict)
                    } else {
                        Err(Completion::Throw(value))
                    }
                }
                other => other,
            };
            if let Some(finalizer) = finalizer {
                let finally_result = execute_statements(ctx, finalizer, env, this, strict);
                match finally_result {
                    Ok(_) => result,
                    abrupt => abrupt,
                }
            } else {
                result
            }
        }
    }
}

fn execute_switch(ctx: &mut Context<'_>, discriminant: &Expression, cases: &[SwitchCase], env: &Environment, this: Value, strict: bool) -> StmtResult {
    let disc = evaluate_expression(ctx, discriminant, env, this, strict)?;
    let mut matched_index = None;
    for (i, case) in cases.iter().enumerate() {
        if let Some(test) = &case.test {
            let test_value = evaluate_expression(ctx, test, env, this, strict)?;
            if strict_equals(ctx, disc, test_value) {
                matched_index = Some(i);
                break;
            }
        }
    }
    let start = match matched_index {
        Some(i) => i,
        None => match cases.iter().position(|c| c.test.is_none()) {
            Some(i) => i,
            None => return Ok(Value::Undefined),
        },
    };
    let mut last = Value::Undefined;
    for case in &cases[start..] {
        match execute_statements(ctx, &case.body, env, this, strict) {
            Ok(v) => last = v,
            Err(Completion::Break(None)) => return Ok(last),
            Err(other) => return Err(other),
        }
    }
    Ok(last)
}

fn enumerable_keys_including_prototypes(ctx: &Context<'_>, obj: ObjectHandle) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut keys = Vec::new();
    let mut current = Some(obj);
    while let Some(o) = current {
        for key in ctx.heap().object(o).own_enumerable_keys() {
            if seen.insert(key.to_string()) {
                keys.push(key.to_string());
            }
        }
        current = ctx.heap().object(o).prototype;
    }
    keys
}

fn set_identifier(ctx: &mut Context<'_>, env: &Environment, name: &Rc<str>, value: Value, strict: bool) -> Result<(), Completion> {
    match env.resolve(ctx.heap(), name) {
        Reference::Declarative(target) => {
            if target.set_mutable_binding(ctx.heap_mut(), name, value, strict).is_err() {
                return Err(ctx.throw_type_error("cannot assign to immutable binding"));
            }
            Ok(())
        }
        Reference::Object(obj) => ctx.put(obj, name, value, strict),
        Reference::Unresolved => {
            if strict {
                return Err(ctx.throw_reference_error(&format!("{name} is not defined")));
            }
            let global = ctx.global_object();
            ctx.put(global, name, value, false)
        }
    }
}

pub(crate) fn strict_equals(ctx: &Context<'_>, a: Value, b: Value) -> bool {
    match (a, b) {
        (Value::String(s1), Value::String(s2)) => ctx.heap().string(s1) == ctx.heap().string(s2),
        (Value::Object(o1), Value::Object(o2)) => o1 == o2,
        _ => a.strictly_equals_primitive(&b),
    }
}

/// Abstract Equality Comparison (ES5 §11.9.3): `==`/`!=`'s coercing rules.
fn loose_equals(ctx: &mut Context<'_>, a: Value, b: Value) -> Result<bool, Completion> {
    use Value::*;
    Ok(match (a, b) {
        (Undefined | Null, Undefined | Null) => true,
        (Number(_), Number(_)) | (String(_), String(_)) | (Boolean(_), Boolean(_)) | (Object(_), Object(_)) => strict_equals(ctx, a, b),
        (Number(_), String(_)) => {
            let n = ctx.to_number(b)?;
            a.to_number_primitive(ctx.heap()) == n
        }
        (String(_), Number(_)) => {
            let n = ctx.to_number(a)?;
            n == b.to_number_primitive(ctx.heap())
        }
        (Boolean(_), _) => {
            let n = ctx.to_number(a)?;
            loose_equals(ctx, Value::Number(n), b)?
        }
        (_, Boolean(_)) => {
            let n = ctx.to_number(b)?;
            loose_equals(ctx, a, Value::Number(n))?
        }
        (Number(_) | String(_), Object(_)) => {
            let prim = ctx.to_primitive(b, Hint::Default)?;
            loose_equals(ctx, a, prim)?
        }
        (Object(_), Number(_) | String(_)) => {
            let prim = ctx.to_primitive(a, Hint::Default)?;
            loose_equals(ctx, prim, b)?
        }
        _ => false,
    })
}

fn evaluate_expression(ctx: &mut Context<'_>, expr: &Expression, env: &Environment, this: Value, strict: bool) -> ValueResult {
    match expr {
        Expression::This => Ok(this),
        Expression::Undefined => Ok(Value::Undefined),
        Expression::Null => Ok(Value::Null),
        Expression::Boolean(b) => Ok(Value::Boolean(*b)),
        Expression::Number(n) => Ok(Value::Number(*n)),
        Expression::String(s) => Ok(ctx.new_string(s.to_string())),
        Expression::RegExp { pattern, flags } => crate::builtins::regexp::construct_literal(ctx, pattern, flags),
        Expression::Identifier(name) => match env.resolve(ctx.heap(), name) {
            Reference::Declarative(target) => target
                .get_binding_value(ctx.heap(), name)
                .ok_or_else(|| ctx.throw_reference_error(&format!("{name} is not defined"))),
            Reference::Object(obj) => ctx.get(obj, name),
            Reference::Unresolved => Err(ctx.throw_reference_error(&format!("{name} is not defined"))),
        },
        Expression::Array(elements) => {
            let array_proto = ctx.intrinsics().array_prototype;
            let mut obj = Object::new(Class::Array, Some(array_proto));
            for (i, element) in elements.iter().enumerate() {
                if let Some(e) = element {
                    let value = evaluate_expression(ctx, e, env, this, strict)?;
                    obj.set_own_property(i.to_string(), PropertyDescriptor::data(value, true, true, true));
                }
            }
            obj.set_own_property(
                "length",
                PropertyDescriptor::data(Value::Number(elements.len() as f64), true, false, false),
            );
            Ok(Value::Object(ctx.heap_mut().allocate_object(obj)))
        }
        Expression::Object(props) => {
            let object_proto = ctx.intrinsics().object_prototype;
            let handle = ctx.heap_mut().allocate_object(Object::new(Class::Object, Some(object_proto)));
            for prop in props {
                match prop {
                    PropertyDefinition::Data(name, value_expr) => {
                        let key = property_name_string(name);
                        let value = evaluate_expression(ctx, value_expr, env, this, strict)?;
                        ctx.heap_mut()
                            .object_mut(handle)
                            .set_own_property(key, PropertyDescriptor::data(value, true, true, true));
                    }
                    PropertyDefinition::Getter(name, body) => {
                        let key = property_name_string(name);
                        let getter = instantiate_function(ctx, None, Vec::new(), body.clone(), env.clone(), strict || body.strict);
                        merge_accessor(ctx, handle, &key, Some(getter), None);
                    }
                    PropertyDefinition::Setter(name, param, body) => {
                        let key = property_name_string(name);
                        let setter = instantiate_function(
                            ctx,
                            None,
                            vec![Param { name: param.clone() }],
                            body.clone(),
                            env.clone(),
                            strict || body.strict,
                        );
                        merge_accessor(ctx, handle, &key, None, Some(setter));
                    }
                }
            }
            Ok(Value::Object(handle))
        }
        Expression::Function { name, params, body } => {
            let func_env = if name.is_some() {
                Environment::new_declarative(Some(env.clone()))
            } else {
                env.clone()
            };
            let func = instantiate_function(ctx, name.clone(), params.clone(), body.clone(), func_env.clone(), strict || body.strict);
            if let Some(n) = name {
                func_env.create_immutable_binding(n.clone());
                func_env.initialize_immutable_binding(n, Value::Object(func));
            }
            Ok(Value::Object(func))
        }
        Expression::Member { object, property, computed } => {
            let (obj_value, key) = evaluate_member(ctx, object, property, *computed, env, this, strict)?;
            if obj_value.is_nullish() {
                return Err(ctx.throw_type_error(&format!("cannot read property '{key}' of {}", obj_value.type_of_primitive())));
            }
            let obj = ctx.to_object(obj_value)?;
            ctx.get(obj, &key)
        }
        Expression::Call { callee, arguments } => {
            let (func, call_this) = match callee.as_ref() {
                Expression::Member { object, property, computed } => {
                    let (obj_value, key) = evaluate_member(ctx, object, property, *computed, env, this, strict)?;
                    if obj_value.is_nullish() {
                        return Err(ctx.throw_type_error(&format!("cannot read property '{key}' of {}", obj_value.type_of_primitive())));
                    }
                    let obj = ctx.to_object(obj_value)?;
                    let func = ctx.get(obj, &key)?;
                    (func, Value::Object(obj))
                }
                Expression::Identifier(name) if &**name == "eval" => {
                    return call_eval(ctx, arguments, env, this, strict);
                }
                other => {
                    let func = evaluate_expression(ctx, other, env, this, strict)?;
                    (func, Value::Undefined)
                }
            };
            let args = evaluate_arguments(ctx, arguments, env, this, strict)?;
            if !ctx.is_callable(func) {
                return Err(ctx.throw_type_error("value is not a function"));
            }
            ctx.call(func, call_this, &args)
        }
        Expression::New { callee, arguments } => {
            let func = evaluate_expression(ctx, callee, env, this, strict)?;
            let args = evaluate_arguments(ctx, arguments, env, this, strict)?;
            ctx.construct(func, &args)
        }
        Expression::Unary { op, argument } => evaluate_unary(ctx, *op, argument, env, this, strict),
        Expression::Binary { op, left, right } => evaluate_binary(ctx, *op, left, right, env, this, strict),
        Expression::Conditional { test, consequent, alternate } => {
            if evaluate_expression(ctx, test, env, this, strict)?.to_boolean(ctx.heap()) {
                evaluate_expression(ctx, consequent, env, this, strict)
            } else {
                evaluate_expression(ctx, alternate, env, this, strict)
            }
        }
        Expression::Assign { op, target, value } => evaluate_assignment(ctx, *op, target, value, env, this, strict),
    }
}

fn merge_accessor(ctx: &mut Context<'_>, obj: ObjectHandle, key: &str, get: Option<ObjectHandle>, set: Option<ObjectHandle>) {
    let object = ctx.heap_mut().object_mut(obj);
    let existing = object.get_own_property(key).cloned();
    let (mut new_get, mut new_set) = match &existing {
        Some(d) if d.is_accessor_descriptor() => (d.get, d.set),
        _ => (None, None),
    };
    if let Some(g) = get {
        new_get = Some(Value::Object(g));
    }
    if let Some(s) = set {
        new_set = Some(Value::Object(s));
    }
    object.set_own_property(key, PropertyDescriptor::accessor(new_get, new_set, true, true));
}

fn property_name_string(name: &PropertyName) -> String {
    match name {
        PropertyName::Identifier(s) => s.to_string(),
        PropertyName::String(s) => s.to_string(),
        PropertyName::Number(n) => crate::value::number_to_string(*n),
    }
}

fn evaluate_member(
    ctx: &mut Context<'_>,
    object: &Expression,
    property: &Expression,
    computed: bool,
    env: &Environment,
    this: Value,
    strict: bool,
) -> Result<(Value, String), Completion> {
    let obj_value = evaluate_expression(ctx, object, env, this, strict)?;
    let key = if computed {
        let key_value = evaluate_expression(ctx, property, env, this, strict)?;
        ctx.to_js_string(key_value)?.as_str().into_owned()
    } else if let Expression::String(s) = property {
        s.to_string()
    } else {
        unreachable!("non-computed member property must be a string literal")
    };
    Ok((obj_value, key))
}

fn evaluate_arguments(ctx: &mut Context<'_>, arguments: &[Argument], env: &Environment, this: Value, strict: bool) -> Result<Vec<Value>, Completion> {
    let mut values = Vec::with_capacity(arguments.len());
    for arg in arguments {
        let Argument::Plain(expr) = arg;
        values.push(evaluate_expression(ctx, expr, env, this, strict)?);
    }
    Ok(values)
}

/// Direct `eval` (ES5 §15.1.2.1/§10.4.2): called in tail position of a bare
/// `eval(...)` call expression, it inherits the caller's variable
/// environment, `this`, and strictness instead of going through `[[Call]]`'s
/// usual fresh-activation path.
fn call_eval(ctx: &mut Context<'_>, arguments: &[Argument], env: &Environment, this: Value, strict: bool) -> ValueResult {
    let args = evaluate_arguments(ctx, arguments, env, this, strict)?;
    let Some(Value::String(s)) = args.first().copied() else {
        return Ok(args.into_iter().next().unwrap_or(Value::Undefined));
    };
    let src = ctx.heap().string(s).as_str().into_owned();
    ctx.eval_source(&src, env, this, strict)
}

fn evaluate_unary(ctx: &mut Context<'_>, op: UnaryOp, argument: &Expression, env: &Environment, this: Value, strict: bool) -> ValueResult {
    if op == UnaryOp::TypeOf {
        if let Expression::Identifier(name) = argument {
            if matches!(env.resolve(ctx.heap(), name), Reference::Unresolved) {
                return Ok(ctx.new_string("undefined"));
            }
        }
    }
    if op == UnaryOp::Delete {
        return match argument {
            Expression::Identifier(name) => match env.resolve(ctx.heap(), name) {
                Reference::Declarative(target) => Ok(Value::Boolean(target.delete_binding(ctx.heap_mut(), name))),
                Reference::Object(obj) => Ok(Value::Boolean(ctx.heap_mut().object_mut(obj).remove_own_property(name).is_some())),
                Reference::Unresolved => Ok(Value::Boolean(true)),
            },
            Expression::Member { object, property, computed } => {
                let (obj_value, key) = evaluate_member(ctx, object, property, *computed, env, this, strict)?;
                if obj_value.is_nullish() {
                    return Err(ctx.throw_type_error("cannot delete property of null or undefined"));
                }
                let obj = ctx.to_object(obj_value)?;
                let existing = ctx.heap().object(obj).get_own_property(&key).cloned();
                match existing {
                    Some(d) if !d.configurable() => {
                        if strict {
                            Err(ctx.throw_type_error("cannot delete non-configurable property"))
                        } else {
                            Ok(Value::Boolean(false))
                        }
                    }
                    _ => {
                        ctx.heap_mut().object_mut(obj).remove_own_property(&key);
                        Ok(Value::Boolean(true))
                    }
                }
            }
            _ => Ok(Value::Boolean(true)),
        };
    }
    if matches!(op, UnaryOp::PreIncrement | UnaryOp::PreDecrement | UnaryOp::PostIncrement | UnaryOp::PostDecrement) {
        let current = evaluate_expression(ctx, argument, env, this, strict)?;
        let old = ctx.to_number(current)?;
        let new = if matches!(op, UnaryOp::PreIncrement | UnaryOp::PostIncrement) { old + 1.0 } else { old - 1.0 };
        assign_to_target(ctx, argument, Value::Number(new), env, this, strict)?;
        return Ok(Value::Number(if matches!(op, UnaryOp::PreIncrement | UnaryOp::PreDecrement) { new } else { old }));
    }
    let value = evaluate_expression(ctx, argument, env, this, strict)?;
    Ok(match op {
        UnaryOp::Plus => Value::Number(ctx.to_number(value)?),
        UnaryOp::Minus => Value::Number(-ctx.to_number(value)?),
        UnaryOp::Not => Value::Boolean(!value.to_boolean(ctx.heap())),
        UnaryOp::BitNot => Value::Number(!ctx.to_int32(value)? as f64),
        UnaryOp::Void => Value::Undefined,
        UnaryOp::TypeOf => {
            let s = match value {
                Value::Object(o) if ctx.heap().object(o).is_callable() => "function",
                other => other.type_of_primitive(),
            };
            ctx.new_string(s)
        }
        UnaryOp::Delete | UnaryOp::PreIncrement | UnaryOp::PreDecrement | UnaryOp::PostIncrement | UnaryOp::PostDecrement => {
            unreachable!("handled above")
        }
    })
}

fn evaluate_binary(ctx: &mut Context<'_>, op: BinOp, left: &Expression, right: &Expression, env: &Environment, this: Value, strict: bool) -> ValueResult {
    if op == BinOp::And {
        let l = evaluate_expression(ctx, left, env, this, strict)?;
        return if l.to_boolean(ctx.heap()) { evaluate_expression(ctx, right, env, this, strict) } else { Ok(l) };
    }
    if op == BinOp::Or {
        let l = evaluate_expression(ctx, left, env, this, strict)?;
        return if l.to_boolean(ctx.heap()) { Ok(l) } else { evaluate_expression(ctx, right, env, this, strict) };
    }
    if op == BinOp::Comma {
        evaluate_expression(ctx, left, env, this, strict)?;
        return evaluate_expression(ctx, right, env, this, strict);
    }
    let l = evaluate_expression(ctx, left, env, this, strict)?;
    let r = evaluate_expression(ctx, right, env, this, strict)?;
    Ok(match op {
        BinOp::Add => {
            let lp = ctx.to_primitive(l, Hint::Default)?;
            let rp = ctx.to_primitive(r, Hint::Default)?;
            if lp.as_string().is_some() || rp.as_string().is_some() {
                let ls = ctx.to_js_string(lp)?;
                let rs = ctx.to_js_string(rp)?;
                let joined = ls.concat(&rs);
                Value::String(ctx.heap_mut().allocate_string(joined))
            } else {
                Value::Number(ctx.to_number(lp)? + ctx.to_number(rp)?)
            }
        }
        BinOp::Sub => Value::Number(ctx.to_number(l)? - ctx.to_number(r)?),
        BinOp::Mul => Value::Number(ctx.to_number(l)? * ctx.to_number(r)?),
        BinOp::Div => Value::Number(ctx.to_number(l)? / ctx.to_number(r)?),
        BinOp::Mod => Value::Number(ctx.to_number(l)? % ctx.to_number(r)?),
        BinOp::BitAnd => Value::Number((ctx.to_int32(l)? & ctx.to_int32(r)?) as f64),
        BinOp::BitOr => Value::Number((ctx.to_int32(l)? | ctx.to_int32(r)?) as f64),
        BinOp::BitXor => Value::Number((ctx.to_int32(l)? ^ ctx.to_int32(r)?) as f64),
        BinOp::Shl => Value::Number(((ctx.to_int32(l)? as i32).wrapping_shl(ctx.to_uint32(r)? & 0x1f)) as f64),
        BinOp::Shr => Value::Number(((ctx.to_int32(l)? as i32).wrapping_shr(ctx.to_uint32(r)? & 0x1f)) as f64),
        BinOp::UShr => Value::Number(((ctx.to_uint32(l)? as u32).wrapping_shr(ctx.to_uint32(r)? & 0x1f)) as f64),
        BinOp::Eq => Value::Boolean(loose_equals(ctx, l, r)?),
        BinOp::NotEq => Value::Boolean(!loose_equals(ctx, l, r)?),
        BinOp::StrictEq => Value::Boolean(strict_equals(ctx, l, r)),
        BinOp::StrictNotEq => Value::Boolean(!strict_equals(ctx, l, r)),
        BinOp::Lt | BinOp::Gt | BinOp::LtEq | BinOp::GtEq => Value::Boolean(relational(ctx, op, l, r)?),
        BinOp::InstanceOf => Value::Boolean(instance_of(ctx, l, r)?),
        BinOp::In => {
            let Value::Object(obj) = r else {
                return Err(ctx.throw_type_error("cannot use 'in' operator on a non-object"));
            };
            let key = ctx.to_js_string(l)?;
            Value::Boolean(ctx.has_property(obj, &key.as_str()))
        }
        BinOp::And | BinOp::Or | BinOp::Comma => unreachable!("handled above"),
    })
}

fn relational(ctx: &mut Context<'_>, op: BinOp, l: Value, r: Value) -> Result<bool, Completion> {
    let lp = ctx.to_primitive(l, Hint::Number)?;
    let rp = ctx.to_primitive(r, Hint::Number)?;
    if let (Value::String(ls), Value::String(rs)) = (lp, rp) {
        let (ls, rs) = (ctx.heap().string(ls).clone(), ctx.heap().string(rs).clone());
        return Ok(match op {
            BinOp::Lt => ls < rs,
            BinOp::Gt => ls > rs,
            BinOp::LtEq => ls <= rs,
            BinOp::GtEq => ls >= rs,
            _ => unreachable!(),
        });
    }
    let ln = ctx.to_number(lp)?;
    let rn = ctx.to_number(rp)?;
    if ln.is_nan() || rn.is_nan() {
        return Ok(false);
    }
    Ok(match op {
        BinOp::Lt => ln < rn,
        BinOp::Gt => ln > rn,
        BinOp::LtEq => ln <= rn,
        BinOp::GtEq => ln >= rn,
        _ => unreachable!(),
    })
}

fn instance_of(ctx: &mut Context<'_>, l: Value, r: Value) -> Result<bool, Completion> {
    let Value::Object(ctor) = r else {
        return Err(ctx.throw_type_error("right-hand side of 'instanceof' is not callable"));
    };
    if !ctx.heap().object(ctor).is_callable() {
        return Err(ctx.throw_type_error("right-hand side of 'instanceof' is not callable"));
    }
    let Value::Object(mut obj) = l else { return Ok(false) };
    let proto_value = ctx.get(ctor, "prototype")?;
    let Value::Object(proto) = proto_value else {
        return Err(ctx.throw_type_error("'prototype' property of the right-hand side is not an object"));
    };
    loop {
        let next = ctx.heap().object(obj).prototype;
        match next {
            Some(p) if p == proto => return Ok(true),
            Some(p) => obj = p,
            None => return Ok(false),
        }
    }
}

fn assign_to_target(ctx: &mut Context<'_>, target: &Expression, value: Value, env: &Environment, this: Value, strict: bool) -> Result<(), Completion> {
    match target {
        Expression::Identifier(name) => set_identifier(ctx, env, name, value, strict),
        Expression::Member { object, property, computed } => {
            let (obj_value, key) = evaluate_member(ctx, object, property, *computed, env, this, strict)?;
            let obj = ctx.to_object(obj_value)?;
            ctx.put(obj, &key, value, strict)
        }
        _ => Err(ctx.throw_reference_error("invalid assignment target")),
    }
}

fn evaluate_assignment(
    ctx: &mut Context<'_>,
    op: AssignOp,
    target: &Expression,
    value_expr: &Expression,
    env: &Environment,
    this: Value,
    strict: bool,
) -> ValueResult {
    if op == AssignOp::Assign {
        let value = evaluate_expression(ctx, value_expr, env, this, strict)?;
        assign_to_target(ctx, target, value, env, this, strict)?;
        return Ok(value);
    }
    let current = evaluate_expression(ctx, target, env, this, strict)?;
    let rhs = evaluate_expression(ctx, value_expr, env, this, strict)?;
    let result = match op {
        AssignOp::Add => {
            let lp = ctx.to_primitive(current, Hint::Default)?;
            let rp = ctx.to_primitive(rhs, Hint::Default)?;
            if lp.as_string().is_some() || rp.as_string().is_some() {
                let ls = ctx.to_js_string(lp)?;
                let rs = ctx.to_js_string(rp)?;
                Value::String(ctx.heap_mut().allocate_string(ls.concat(&rs)))
            } else {
                Value::Number(ctx.to_number(lp)? + ctx.to_number(rp)?)
            }
        }
        AssignOp::Sub => Value::Number(ctx.to_number(current)? - ctx.to_number(rhs)?),
        AssignOp::Mul => Value::Number(ctx.to_number(current)? * ctx.to_number(rhs)?),
        AssignOp::Div => Value::Number(ctx.to_number(current)? / ctx.to_number(rhs)?),
        AssignOp::Mod => Value::Number(ctx.to_number(current)? % ctx.to_number(rhs)?),
        AssignOp::BitAnd => Value::Number((ctx.to_int32(current)? & ctx.to_int32(rhs)?) as f64),
        AssignOp::BitOr => Value::Number((ctx.to_int32(current)? | ctx.to_int32(rhs)?) as f64),
        AssignOp::BitXor => Value::Number((ctx.to_int32(current)? ^ ctx.to_int32(rhs)?) as f64),
        AssignOp::Shl => Value::Number(((ctx.to_int32(current)? as i32).wrapping_shl(ctx.to_uint32(rhs)? & 0x1f)) as f64),
        AssignOp::Shr => Value::Number(((ctx.to_int32(current)? as i32).wrapping_shr(ctx.to_uint32(rhs)? & 0x1f)) as f64),
        AssignOp::UShr => Value::Number(((ctx.to_uint32(current)? as u32).wrapping_shr(ctx.to_uint32(rhs)? & 0x1f)) as f64),
        AssignOp::Assign => unreachable!("handled above"),
    };
    assign_to_target(ctx, target, result, env, this, strict)?;
    Ok(result)
}

/// `[[Call]]` for an ordinary (script-defined) function (ES5 §13.2.1 /
/// §10.4.3's activation-object setup, §10.6's arguments object): creates a
/// fresh declarative activation environment whose outer is the function's
/// captured `scope`, binds parameters and the `arguments` object, then
/// hoists and runs the body.
#[allow(clippy::too_many_arguments)]
pub fn call_ordinary_function(
    ctx: &mut Context<'_>,
    fn_obj: ObjectHandle,
    params: &[Param],
    body: &FunctionBody,
    scope: &Environment,
    strict: bool,
    _name: Option<&str>,
    this: Value,
    args: &[Value],
) -> ValueResult {
    let call_this = if strict {
        this
    } else if this.is_nullish() {
        Value::Object(ctx.global_object())
    } else if !this.is_object() {
        Value::Object(ctx.to_object(this)?)
    } else {
        this
    };
    let activation = Environment::new_declarative(Some(scope.clone()));
    let mut mapped = Vec::with_capacity(params.len());
    for (i, param) in params.iter().enumerate() {
        let value = args.get(i).copied().unwrap_or(Value::Undefined);
        activation.create_mutable_binding(ctx.heap_mut(), &param.name, false);
        let _ = activation.set_mutable_binding(ctx.heap_mut(), &param.name, value, false);
        mapped.push(Some(param.name.clone()));
    }
    let arguments_name: Rc<str> = Rc::from("arguments");
    if !strict && !activation.has_binding(ctx.heap(), "arguments") {
        let arguments_obj = create_arguments_object(ctx, fn_obj, params, &mapped, &activation, args, false);
        activation.create_mutable_binding(ctx.heap_mut(), &arguments_name, false);
        let _ = activation.set_mutable_binding(ctx.heap_mut(), "arguments", Value::Object(arguments_obj), false);
    } else if strict {
        let arguments_obj = create_arguments_object(ctx, fn_obj, params, &[], &activation, args, true);
        activation.create_mutable_binding(ctx.heap_mut(), &arguments_name, false);
        let _ = activation.set_mutable_binding(ctx.heap_mut(), "arguments", Value::Object(arguments_obj), false);
    }
    hoist_declarations(ctx, &body.body, &activation, strict || body.strict);
    match execute_statements(ctx, &body.body, &activation, call_this, strict || body.strict) {
        Ok(_) => Ok(Value::Undefined),
        Err(Completion::Return(v)) => Ok(v),
        Err(other) => Err(other),
    }
}

/// A function that throws on both get and set — `arguments.callee` and
/// `arguments.caller`'s strict-mode "poison pill" (ES5 §10.6, Annex C).
fn throw_poisoned_property(
    ctx: &mut Context<'_>,
    _this: Value,
    _args: &[Value],
) -> Result<Value, Completion> {
    Err(ctx.throw_type_error("'callee'/'caller' cannot be accessed in strict mode"))
}

/// The `arguments` object: a non-strict, non-mapped-parameter-free
/// function gets a live bidirectional mapping between `arguments[i]` and
/// the corresponding named parameter; strict functions (and functions
/// whose formal list maps ambiguously, simplified here to "all strict
/// functions") get a plain snapshot plus a poisoned `callee`/`caller`.
fn create_arguments_object(
    ctx: &mut Context<'_>,
    callee: ObjectHandle,
    params: &[Param],
    mapped: &[Option<Rc<str>>],
    scope: &Environment,
    args: &[Value],
    strict: bool,
) -> ObjectHandle {
    let proto = ctx.object_prototype();
    let mut obj = Object::new(Class::Arguments, Some(proto));
    for (i, value) in args.iter().enumerate() {
        obj.set_own_property(i.to_string(), PropertyDescriptor::data(*value, true, true, true));
    }
    obj.set_own_property("length", PropertyDescriptor::data(Value::Number(args.len() as f64), true, false, true));
    if strict {
        let poison = crate::object::builder::FunctionBuilder::native(ctx, throw_poisoned_property)
            .name("")
            .length(0)
            .build();
        obj.set_own_property(
            "callee",
            PropertyDescriptor::accessor(Some(Value::Object(poison)), Some(Value::Object(poison)), false, false),
        );
        obj.set_own_property(
            "caller",
            PropertyDescriptor::accessor(Some(Value::Object(poison)), Some(Value::Object(poison)), false, false),
        );
    } else {
        obj.set_own_property("callee", PropertyDescriptor::data(Value::Object(callee), true, false, true));
    }
    if !mapped.is_empty() {
        let map: Vec<Option<Rc<str>>> = (0..args.len().min(params.len()))
            .map(|i| mapped.get(i).cloned().flatten())
            .collect();
        obj.kind.arguments = Some(ArgumentsMap { mapped: map, scope: scope.clone() });
    }
    ctx.heap_mut().allocate_object(obj)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::EsVersion;
    use crate::heap::Heap;

    fn run(src: &str) -> Value {
        let mut heap = Heap::new(1 << 20);
        let mut ctx = Context::new(&mut heap, EsVersion::Es5);
        crate::eval(&mut ctx, src).unwrap()
    }

    #[test]
    fn var_and_arithmetic() {
        assert_eq!(run("var x = 1; var y = 2; x + y;"), Value::Number(3.0));
    }

    #[test]
    fn function_call_returns_value() {
        assert_eq!(run("function add(a, b) { return a + b; } add(2, 3);"), Value::Number(5.0));
    }

    #[test]
    fn closures_capture_scope() {
        assert_eq!(
            run("function counter() { var n = 0; return function() { n = n + 1; return n; }; } var c = counter(); c(); c();"),
            Value::Number(2.0)
        );
    }

    #[test]
    fn for_loop_accumulates() {
        assert_eq!(run("var sum = 0; for (var i = 0; i < 5; i = i + 1) { sum = sum + i; } sum;"), Value::Number(10.0));
    }

    #[test]
    fn typeof_unresolved_identifier_is_undefined_not_a_throw() {
        assert_eq!(run("typeof someUndeclaredName;").to_boolean(&Heap::new(1 << 10)), true);
    }

    #[test]
    fn strict_arguments_callee_is_a_poisoned_accessor() {
        assert_eq!(
            run(
                "var threw = false;
                 function f() {
                     'use strict';
                     try { arguments.callee; } catch (e) { threw = (e instanceof TypeError); }
                 }
                 f();
                 threw;"
            ),
            Value::Boolean(true)
        );
    }

    #[test]
    fn bound_function_construct_uses_target_prototype_and_args() {
        assert_eq!(
            run(
                "function Point(x) { this.x = x; }
                 Point.prototype.getX = function () { return this.x; };
                 var Bound = Point.bind({ x: 999 }, 5);
                 var p = new Bound();
                 (p instanceof Point) && p.getX() === 5;"
            ),
            Value::Boolean(true)
        );
    }
}
