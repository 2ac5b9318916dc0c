//! GraphQL API definitions.

pub mod category;
mod mutation;
pub mod pagination;
pub mod quotation;
mod query;
pub mod review;
pub mod seller;
pub mod service;
pub mod subcategory;

use std::str::FromStr;

use juniper::{EmptySubscription, ID};

use crate::{define_error, Context, Error};

pub use self::{
    category::Category, mutation::Mutation, pagination::PageInfo,
    quotation::Quotation, query::Query, review::Review, seller::Seller,
    service::Service, subcategory::Subcategory,
};

/// GraphQL schema.
pub type Schema =
    juniper::RootNode<'static, Query, Mutation, EmptySubscription<Context>>;

/// Creates a new [`Schema`].
#[must_use]
pub fn schema() -> Schema {
    Schema::new(Query, Mutation, EmptySubscription::new())
}

/// Parses the provided GraphQL [`ID`] into an identifier of an entity.
///
/// # Errors
///
/// With `INVALID_ID` if the [`ID`] doesn't represent a `T`.
pub(crate) fn parse_id<T: FromStr>(id: &ID) -> Result<T, Error> {
    id.parse().map_err(|_| {
        Error::from(InputError::InvalidId)
            .with_message(format!("`{}` is not a valid ID", &**id))
    })
}

/// Parses the provided `value` of the input `field`.
///
/// # Errors
///
/// With `INVALID_INPUT` if the `value` doesn't represent a `T`.
pub(crate) fn parse<T: FromStr>(
    field: &str,
    value: impl AsRef<str>,
) -> Result<T, Error> {
    value.as_ref().parse().map_err(|_| invalid(field))
}

/// Parses each of the provided `values` of the input `field`.
///
/// # Errors
///
/// With `INVALID_INPUT` if any of the `values` doesn't represent a `T`.
pub(crate) fn parse_all<T: FromStr>(
    field: &str,
    values: impl IntoIterator<Item = impl AsRef<str>>,
) -> Result<Vec<T>, Error> {
    values.into_iter().map(|v| parse(field, v)).collect()
}

/// Creates a new `INVALID_INPUT` [`Error`] for the provided input `field`.
pub(crate) fn invalid(field: &str) -> Error {
    Error::from(InputError::InvalidInput)
        .with_message(format!("Invalid `{field}` value"))
}

define_error! {
    enum InputError {
        #[code = "INVALID_ID"]
        #[kind = BadRequest]
        #[message = "Invalid ID"]
        InvalidId,

        #[code = "INVALID_INPUT"]
        #[kind = BadRequest]
        #[message = "Invalid input"]
        InvalidInput,
    }
}

#[cfg(test)]
mod spec {
    use juniper::{InputValue, ID};
    use marketplace::domain::{seller, service};

    use crate::error::Kind;

    use super::{parse, parse_all, parse_id, schema};

    #[test]
    fn pagination_arguments_are_nullable_with_defaults() {
        let schema = schema();
        for (ty, field) in [
            ("Query", "getServices"),
            ("Query", "getServiceSubCategories"),
            ("Query", "getQuotationsByStatus"),
            ("Query", "getServiceReviewsByReviewer"),
            ("ServiceCategory", "services"),
            ("ServiceSubCategory", "services"),
        ] {
            let args = schema
                .schema
                .concrete_type_by_name(ty)
                .and_then(|t| t.field_by_name(field))
                .and_then(|f| f.arguments.as_ref())
                .unwrap_or_else(|| panic!("`{ty}.{field}` has no arguments"));

            for (name, default) in [("page", 1), ("pageSize", 10)] {
                let arg = args
                    .iter()
                    .find(|a| &*a.name == name)
                    .unwrap_or_else(|| panic!("`{ty}.{field}` lacks `{name}`"));
                assert_eq!(
                    arg.arg_type.to_string(),
                    "Int",
                    "`{ty}.{field}({name})`",
                );
                assert_eq!(
                    arg.default_value,
                    Some(InputValue::scalar(default)),
                    "`{ty}.{field}({name})`",
                );
            }
        }
    }

    #[test]
    fn parses_entity_ids() {
        assert_eq!(
            parse_id::<service::Id>(&ID::from("42".to_owned())).ok(),
            Some(service::Id::from(42)),
        );

        let err = parse_id::<service::Id>(&ID::from("forty".to_owned()))
            .expect_err("not an integer");
        assert_eq!(err.code, "INVALID_ID");
        assert_eq!(err.kind, Kind::BadRequest);
    }

    #[test]
    fn takes_seller_ids_verbatim() {
        let id = parse_id::<seller::Id>(&ID::from("user_2x7Ab".to_owned()))
            .expect("parsed");
        assert_eq!(id.as_ref(), "user_2x7Ab");

        assert!(parse_id::<seller::Id>(&ID::from(String::new())).is_err());
    }

    #[test]
    fn rejects_invalid_input() {
        let err = parse::<service::Name>("name", " padded ")
            .expect_err("surrounded by whitespace");
        assert_eq!(err.code, "INVALID_INPUT");
        assert_eq!(err.message, "Invalid `name` value");

        let tags = parse_all::<service::Tag>("tags", ["pipes", "leaks"])
            .expect("parsed");
        assert_eq!(tags.len(), 2);
        assert!(parse_all::<service::Tag>("tags", ["ok", ""]).is_err());
    }
}
