//! Fluent assembly of a [`SendInputRequest`].
//!
//! Every append call opens a new group, numbered from 0 in call order. A
//! two-sided document is the only case where one group holds two inputs.
//! `build` consumes the builder, so a finished request can never be extended.

use crate::models::{
    DocumentMetadata, DocumentPhotoData, FileData, FileRecord, Input, InputData, Page, SelfieData,
    SendInputRequest,
};

#[derive(Debug, Default)]
pub struct SendInputRequestBuilder {
    inputs: Vec<Input>,
    files: Vec<FileRecord>,
    next_group: u32,
}

impl SendInputRequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_with_document_photo(
        document: DocumentMetadata,
        front: FileData,
        back: Option<FileData>,
    ) -> Self {
        Self::new().append_document_photo(document, front, back)
    }

    pub fn create_with_selfie_photo(selfie: FileData) -> Self {
        Self::new().append_selfie_photo(selfie)
    }

    pub fn create_with_selfie_video(video: FileData) -> Self {
        Self::new().append_selfie_video(video)
    }

    /// Front page, plus the back page when given, under one shared group.
    pub fn append_document_photo(
        mut self,
        document: DocumentMetadata,
        front: FileData,
        back: Option<FileData>,
    ) -> Self {
        let group = self.open_group();
        self.push_document_page(group, &document, Page::Front, front);
        if let Some(back) = back {
            self.push_document_page(group, &document, Page::Back, back);
        }
        self
    }

    pub fn append_selfie_photo(mut self, selfie: FileData) -> Self {
        let group = self.open_group();
        self.push(
            group,
            InputData::SelfiePhoto(SelfieData {
                filename: selfie.filename.clone(),
            }),
            selfie,
        );
        self
    }

    pub fn append_selfie_video(mut self, video: FileData) -> Self {
        let group = self.open_group();
        self.push(
            group,
            InputData::SelfieVideo(SelfieData {
                filename: video.filename.clone(),
            }),
            video,
        );
        self
    }

    pub fn build(self) -> SendInputRequest {
        SendInputRequest::from_parts(self.inputs, self.files)
    }

    fn open_group(&mut self) -> u32 {
        let group = self.next_group;
        self.next_group += 1;
        group
    }

    fn push_document_page(
        &mut self,
        group: u32,
        document: &DocumentMetadata,
        page: Page,
        file: FileData,
    ) {
        let data = InputData::DocumentPhoto(DocumentPhotoData {
            document_type: document.document_type,
            country: document.country.clone(),
            region: document.region.clone(),
            page,
            filename: file.filename.clone(),
        });
        self.push(group, data, file);
    }

    // Inputs and files are pushed together so their orders always match.
    fn push(&mut self, group: u32, data: InputData, file: FileData) {
        self.files.push(FileRecord {
            file_name: file.filename,
            media_type: data.media_type(),
            source: file.source,
        });
        self.inputs.push(Input { group, data });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DocumentType, InputType, MediaType};

    fn national_id() -> DocumentMetadata {
        DocumentMetadata::new(DocumentType::NationalId, "US").with_region("IL")
    }

    fn file(name: &str) -> FileData {
        FileData::from_bytes(name, name.as_bytes().to_vec())
    }

    fn page_of(input: &Input) -> Page {
        match &input.data {
            InputData::DocumentPhoto(data) => data.page,
            other => panic!("not a document photo: {other:?}"),
        }
    }

    #[test]
    fn test_two_sided_document_shares_group_zero() {
        let request = SendInputRequestBuilder::create_with_document_photo(
            national_id(),
            file("front.png"),
            Some(file("back.png")),
        )
        .build();

        assert_eq!(request.inputs().len(), 2);
        assert_eq!(request.files().len(), 2);
        assert!(request.inputs().iter().all(|input| input.group == 0));
        assert_eq!(page_of(&request.inputs()[0]), Page::Front);
        assert_eq!(page_of(&request.inputs()[1]), Page::Back);
        assert_eq!(request.files()[0].file_name, "front.png");
        assert_eq!(request.files()[1].file_name, "back.png");
        assert!(
            request
                .files()
                .iter()
                .all(|f| f.media_type == MediaType::Document)
        );
    }

    #[test]
    fn test_front_only_document() {
        let request =
            SendInputRequestBuilder::create_with_document_photo(national_id(), file("front.png"), None)
                .build();

        assert_eq!(request.inputs().len(), 1);
        assert_eq!(page_of(&request.inputs()[0]), Page::Front);
        match &request.inputs()[0].data {
            InputData::DocumentPhoto(data) => {
                assert_eq!(data.document_type, DocumentType::NationalId);
                assert_eq!(data.country, "US");
                assert_eq!(data.region.as_deref(), Some("IL"));
            }
            other => panic!("unexpected input: {other:?}"),
        }
    }

    #[test]
    fn test_each_append_opens_next_group() {
        let request = SendInputRequestBuilder::new()
            .append_document_photo(national_id(), file("front.png"), None)
            .append_selfie_photo(file("selfie.jpg"))
            .append_selfie_video(file("video.mp4"))
            .build();

        let groups: Vec<u32> = request.inputs().iter().map(|input| input.group).collect();
        assert_eq!(groups, vec![0, 1, 2]);

        let types: Vec<InputType> = request
            .inputs()
            .iter()
            .map(|input| input.data.input_type())
            .collect();
        assert_eq!(
            types,
            vec![
                InputType::DocumentPhoto,
                InputType::SelfiePhoto,
                InputType::SelfieVideo
            ]
        );

        let media: Vec<MediaType> = request.files().iter().map(|f| f.media_type).collect();
        assert_eq!(
            media,
            vec![MediaType::Document, MediaType::Selfie, MediaType::Video]
        );
    }

    #[test]
    fn test_group_counter_advances_once_per_document() {
        let request = SendInputRequestBuilder::new()
            .append_document_photo(national_id(), file("a-front.png"), Some(file("a-back.png")))
            .append_document_photo(
                DocumentMetadata::new(DocumentType::Passport, "MX"),
                file("passport.png"),
                None,
            )
            .build();

        let groups: Vec<u32> = request.inputs().iter().map(|input| input.group).collect();
        assert_eq!(groups, vec![0, 0, 1]);
    }

    #[test]
    fn test_files_follow_input_order() {
        let request = SendInputRequestBuilder::create_with_selfie_video(file("video.mp4"))
            .append_selfie_photo(file("selfie.jpg"))
            .build();

        let names: Vec<&str> = request
            .files()
            .iter()
            .map(|f| f.file_name.as_str())
            .collect();
        let input_names: Vec<&str> = request
            .inputs()
            .iter()
            .map(|input| input.data.filename())
            .collect();
        assert_eq!(names, input_names);
    }
}
