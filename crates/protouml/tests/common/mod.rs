//! Descriptor fixtures shared by the integration tests

#![allow(dead_code)]

use prost_types::field_descriptor_proto::Type;
use prost_types::{DescriptorProto, FieldDescriptorProto, FileDescriptorProto, FileDescriptorSet};
use protouml::plugins::protobuf::DescriptorSetLoader;

pub fn scalar(name: &str, ty: Type) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        r#type: Some(ty as i32),
        ..Default::default()
    }
}

pub fn reference(name: &str, type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        r#type: Some(Type::Message as i32),
        type_name: Some(type_name.to_string()),
        ..Default::default()
    }
}

pub fn message(name: &str, fields: Vec<FieldDescriptorProto>) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.to_string()),
        field: fields,
        ..Default::default()
    }
}

pub fn file(name: &str, imports: &[&str], messages: Vec<DescriptorProto>) -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some(name.to_string()),
        dependency: imports.iter().map(|s| s.to_string()).collect(),
        message_type: messages,
        ..Default::default()
    }
}

pub fn loader(files: Vec<FileDescriptorProto>) -> DescriptorSetLoader {
    DescriptorSetLoader::from_set(FileDescriptorSet { file: files })
}

/// `shop/order.proto` importing `shop/customer.proto`
pub fn order_and_customer() -> DescriptorSetLoader {
    loader(vec![
        file(
            "shop/order.proto",
            &["shop/customer.proto"],
            vec![message(
                "Order",
                vec![
                    scalar("id", Type::Int32),
                    reference("customer", ".shop.Customer"),
                ],
            )],
        ),
        file(
            "shop/customer.proto",
            &[],
            vec![message("Customer", vec![scalar("name", Type::String)])],
        ),
    ])
}
