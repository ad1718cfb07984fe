//! Textual schema description of the API graph
//!
//! Consumed by downstream query-generation tooling; the builder keeps the
//! graph it creates consistent with these labels, property names, and
//! relationship directions.

pub const SCHEMA_DESCRIPTION: &str = "\
Node labels and properties:
  Project   {name}
  Folder    {name}
  File      {name}
  Class     {name, comment, attributes}
  Function  {name, comment, parameter, decorators, returns}
  Parameter {name, comment, type, default}
  Decorator {name}

Function.parameter, Function.decorators and Function.returns are
JSON-serialized; Parameter.type and Parameter.default are JSON-serialized
values. Class.attributes is a JSON-serialized list of {name, value,
comment} records, present only when the class declares attributes.

Relationships (directed):
  (Folder)   -[:INCLUDED_IN]->   (Project)
  (File)     -[:INCLUDED_IN]->   (Folder)
  (Class)    -[:DECLARED_AT]->   (File)
  (Function) -[:DECLARED_AT]->   (File)
  (Class)    -[:INHERITS_FROM]-> (Class)
  (Class)    -[:HAS]->           (Function)   method
  (Class)    -[:HAS]->           (Class)      nested class
  (Class)    -[:HAS]->           (Decorator)
  (Function) -[:HAS]->           (Parameter)
  (Function) -[:HAS]->           (Decorator)
  (Parameter)-[:OF_TYPE]->       (Class)
";

/// The schema text handed to external query-generation components.
pub fn schema_description() -> &'static str {
    SCHEMA_DESCRIPTION
}
