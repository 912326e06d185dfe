//! Person / Address fixtures shared by the integration tests.
#![allow(dead_code)]

use json_format::{combine, obj, FieldResult, FnFormat, Format, JsValueExt, ToJson};
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct Address {
    pub number: String,
    pub street: String,
    pub city: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub name: String,
    pub surname: String,
    pub age: i32,
    pub address: Address,
}

fn read_address(value: &Value) -> FieldResult<Address> {
    combine((
        value.field("number").read::<String>(),
        value.field("street").read::<String>(),
        value.field("city").read::<String>(),
    ))
    .map(|(number, street, city)| Address {
        number,
        street,
        city,
    })
}

fn write_address(address: &Address) -> Value {
    obj([
        ("number", address.number.to_json()),
        ("street", address.street.to_json()),
        ("city", address.city.to_json()),
    ])
}

pub static ADDRESS_FORMAT: FnFormat<Address> =
    FnFormat::new(read_address, write_address).with_fields(&["number", "street", "city"]);

fn read_person(value: &Value) -> FieldResult<Person> {
    combine((
        value.field("name").read::<String>(),
        value.field("surname").read::<String>(),
        value.field("age").read::<i32>(),
        value.field("address").read_with(&ADDRESS_FORMAT),
    ))
    .map(|(name, surname, age, address)| Person {
        name,
        surname,
        age,
        address,
    })
}

fn write_person(person: &Person) -> Value {
    obj([
        ("name", person.name.to_json()),
        ("surname", person.surname.to_json()),
        ("age", person.age.to_json()),
        ("address", ADDRESS_FORMAT.write(&person.address)),
    ])
}

pub static PERSON_FORMAT: FnFormat<Person> = FnFormat::new(read_person, write_person)
    .with_fields(&["name", "surname", "age", "address"]);

pub fn john() -> Person {
    Person {
        name: "John".into(),
        surname: "Doe".into(),
        age: 42,
        address: Address {
            number: "221b".into(),
            street: "Baker Street".into(),
            city: "London".into(),
        },
    }
}

pub fn john_json() -> Value {
    json!({
        "name": "John",
        "surname": "Doe",
        "age": 42,
        "address": {
            "number": "221b",
            "street": "Baker Street",
            "city": "London"
        }
    })
}

/// Same as [`john_json`] but with `address` misspelled.
pub fn bad_john_json() -> Value {
    json!({
        "name": "John",
        "surname": "Doe",
        "age": 42,
        "adresse": {
            "number": "221b",
            "street": "Baker Street",
            "city": "London"
        }
    })
}
